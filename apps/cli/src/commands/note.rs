//! Note classification command.

use study_core::{auto_categorize, extract_tags, merge_tags, Category};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NoteClassification {
    pub category: Category,
    pub tags: Vec<String>,
}

/// Categorize a note and collect its hashtags on top of `existing_tags`.
pub fn classify_note(title: &str, body: &str, existing_tags: &[String]) -> NoteClassification {
    NoteClassification {
        category: auto_categorize(title, body),
        tags: merge_tags(existing_tags, &extract_tags(title, body)),
    }
}
