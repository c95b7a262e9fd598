//! Core study scheduler shared by host applications.
//!
//! Provides:
//! - Card record store with validated, atomic updates
//! - Simplified SM-2 review scheduler
//! - Due-set selection and the cursor over presented cards
//! - Session and lifetime review statistics
//! - Note categorization and hashtag helpers

pub mod algorithm;
pub mod deck;
pub mod due;
pub mod error;
pub mod notes;
pub mod stats;
pub mod store;
pub mod types;

pub use algorithm::{get_algorithm, sm2::Sm2, SchedulingResult, SpacedRepetitionAlgorithm};
pub use deck::{DeckSummary, GradeOutcome, StudyDeck};
pub use due::{due_cards, DueCursor};
pub use error::{Result, StudyError};
pub use notes::{auto_categorize, extract_tags, merge_tags, Category};
pub use stats::{LifetimeStats, SessionStats};
pub use store::CardStore;
pub use types::{Card, CardId, CardPatch, Grade};
