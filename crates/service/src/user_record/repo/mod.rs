pub mod seaorm;

pub use seaorm::SeaOrmUserRecordRepository;
