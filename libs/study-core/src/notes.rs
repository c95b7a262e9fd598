//! Keyword categorization and hashtag extraction for study notes.
//!
//! These are pure helpers for a host's note editor. Nothing here stores or
//! searches notes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Category inferred from note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Study,
    Work,
    Research,
    Ideas,
    Personal,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Work => "work",
            Self::Research => "research",
            Self::Ideas => "ideas",
            Self::Personal => "personal",
            Self::General => "general",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::General
    }
}

/// Checked in order; the first category with a matching keyword wins.
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Study,
        &[
            "study", "learn", "exam", "test", "homework", "assignment", "lecture", "course",
            "class", "education", "school", "university",
        ],
    ),
    (
        Category::Work,
        &[
            "work", "project", "meeting", "deadline", "client", "business", "office", "team",
            "manager", "task", "job",
        ],
    ),
    (
        Category::Research,
        &[
            "research", "analysis", "data", "findings", "hypothesis", "experiment", "study",
            "investigation", "survey",
        ],
    ),
    (
        Category::Ideas,
        &[
            "idea", "brainstorm", "concept", "innovation", "creative", "inspiration", "thought",
            "possibility",
        ],
    ),
    (
        Category::Personal,
        &[
            "personal", "diary", "journal", "reflection", "thoughts", "feelings", "life",
            "family", "friends",
        ],
    ),
];

/// Pick a category from substring keyword matches on title and body.
pub fn auto_categorize(title: &str, body: &str) -> Category {
    let content = format!("{title} {body}").to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| content.contains(word)))
        .map(|(category, _)| *category)
        .unwrap_or_default()
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#[A-Za-z0-9_]+").expect("tag pattern is valid"))
}

/// Lower-cased `#hashtags` in order of appearance, without the `#`.
pub fn extract_tags(title: &str, body: &str) -> Vec<String> {
    let content = format!("{title} {body}");
    tag_pattern()
        .find_iter(&content)
        .map(|m| m.as_str()[1..].to_lowercase())
        .collect()
}

/// Union of both tag lists, first occurrence wins.
pub fn merge_tags(existing: &[String], extracted: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    existing
        .iter()
        .chain(extracted)
        .filter(|tag| seen.insert(*tag))
        .cloned()
        .collect()
}
