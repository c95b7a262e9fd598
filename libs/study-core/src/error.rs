//! Error types for study-core.

use crate::types::CardId;
use thiserror::Error;

/// Result type alias using StudyError.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors reported by card store and scheduling operations.
///
/// None of these are fatal: every operation that fails leaves the deck
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StudyError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("card not found: {0}")]
    NotFound(CardId),

    #[error("no card is currently presented")]
    NoCurrentCard,

    #[error("grade {0} is out of range (expected 1-4)")]
    GradeOutOfRange(u8),
}
