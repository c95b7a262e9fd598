//! Commands exposed to the study shell.

pub mod deck;
pub mod note;
pub mod stats;
pub mod study;

pub use deck::{
    add_card, edit_card, export_deck, list_cards, remove_card, resolve_card_id, CommandError,
    DeckExport,
};
pub use note::{classify_note, NoteClassification};
pub use stats::{get_study_stats, StudyStats};
pub use study::{
    get_current_card, get_due_cards, grade_current_card, preview_grades, start_study,
    GradePreview,
};
