//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{Card, Grade};
use chrono::{DateTime, Utc};

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    /// The card with every scheduling field updated.
    pub card: Card,
    pub next_review: DateTime<Utc>,
    pub is_correct: bool,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the card's next state after a graded review.
    ///
    /// Pure: the input card is left untouched.
    fn schedule(&self, card: &Card, grade: Grade, now: DateTime<Utc>) -> SchedulingResult;

    /// Interval in days that `grade` would produce for `card`.
    fn preview_interval(&self, card: &Card, grade: Grade) -> u32;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
