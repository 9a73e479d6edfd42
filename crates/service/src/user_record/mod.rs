//! Company user records: domain inputs, uniqueness rules, storage, and the service.

pub mod domain;
pub mod uniqueness;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::UserRecordService;
