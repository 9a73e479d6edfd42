//! Service layer for company user records.
//! - Validates create/update input and role-specific rules.
//! - Checks business identifiers for uniqueness before writing.
//! - Talks to storage only through the `UserRecordRepository` trait.

pub mod errors;
pub mod user_record;
#[cfg(test)]
pub mod test_support;

pub use user_record::UserRecordService;
