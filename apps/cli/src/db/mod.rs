//! Local SQLite storage for cards and lifetime stats.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{CardRepository, SqliteRepository, StatsRepository};
