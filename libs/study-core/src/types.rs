//! Core types for the study scheduler.

use crate::error::{Result, StudyError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lowest ease a card can reach.
pub const EASE_FLOOR: f64 = 1.3;

/// Highest ease a card can reach.
pub const EASE_CEILING: f64 = 3.0;

/// Ease assigned to freshly added cards.
pub const INITIAL_EASE: f64 = 2.5;

/// Opaque card identifier, immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CardId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CardId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Learner's self-reported recall quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Good and Easy count as a correct recall.
    pub fn is_correct(self) -> bool {
        self.to_value() >= 3
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = StudyError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_value(value).ok_or(StudyError::GradeOutOfRange(value))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flashcard together with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub ease: f64,
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub correct_streak: u32,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub total_correct: u32,
}

impl Card {
    /// New card, due immediately.
    ///
    /// Text is trimmed; empty sides are rejected.
    pub fn new(front: &str, back: &str, now: DateTime<Utc>) -> Result<Self> {
        let card = Self {
            id: CardId::new(),
            front: front.trim().to_string(),
            back: back.trim().to_string(),
            ease: INITIAL_EASE,
            interval: 1,
            next_review: Some(now),
            created: now,
            last_reviewed: None,
            correct_streak: 0,
            total_reviews: 0,
            total_correct: 0,
        };
        card.validate()?;
        Ok(card)
    }

    /// A card is due once its review time has arrived or was never set.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |at| at <= now)
    }

    /// Percentage of this card's reviews that were correct.
    pub fn accuracy(&self) -> u32 {
        percent(self.total_correct, self.total_reviews)
    }

    /// Check the card invariants.
    pub fn validate(&self) -> Result<()> {
        if self.front.trim().is_empty() {
            return Err(StudyError::Validation("front must not be empty".into()));
        }
        if self.back.trim().is_empty() {
            return Err(StudyError::Validation("back must not be empty".into()));
        }
        if !(EASE_FLOOR..=EASE_CEILING).contains(&self.ease) {
            return Err(StudyError::Validation(format!(
                "ease {} outside [{EASE_FLOOR}, {EASE_CEILING}]",
                self.ease
            )));
        }
        if self.interval < 1 {
            return Err(StudyError::Validation("interval must be at least 1 day".into()));
        }
        if self.total_correct > self.total_reviews {
            return Err(StudyError::Validation(format!(
                "total_correct {} exceeds total_reviews {}",
                self.total_correct, self.total_reviews
            )));
        }
        Ok(())
    }
}

/// Partial update for a single card. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub front: Option<String>,
    pub back: Option<String>,
    pub ease: Option<f64>,
    pub interval: Option<u32>,
    pub next_review: Option<DateTime<Utc>>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub correct_streak: Option<u32>,
    pub total_reviews: Option<u32>,
    pub total_correct: Option<u32>,
}

impl CardPatch {
    /// Patch that only replaces the card text.
    pub fn text(front: Option<&str>, back: Option<&str>) -> Self {
        Self {
            front: front.map(|s| s.trim().to_string()),
            back: back.map(|s| s.trim().to_string()),
            ..Default::default()
        }
    }

    /// Patch carrying every scheduling field of `card`.
    pub fn schedule_of(card: &Card) -> Self {
        Self {
            ease: Some(card.ease),
            interval: Some(card.interval),
            next_review: card.next_review,
            last_reviewed: card.last_reviewed,
            correct_streak: Some(card.correct_streak),
            total_reviews: Some(card.total_reviews),
            total_correct: Some(card.total_correct),
            ..Default::default()
        }
    }

    /// Return `card` with this patch applied. The input is not modified.
    pub fn apply(&self, card: &Card) -> Card {
        let mut next = card.clone();
        if let Some(front) = &self.front {
            next.front = front.clone();
        }
        if let Some(back) = &self.back {
            next.back = back.clone();
        }
        if let Some(ease) = self.ease {
            next.ease = ease;
        }
        if let Some(interval) = self.interval {
            next.interval = interval;
        }
        if self.next_review.is_some() {
            next.next_review = self.next_review;
        }
        if self.last_reviewed.is_some() {
            next.last_reviewed = self.last_reviewed;
        }
        if let Some(streak) = self.correct_streak {
            next.correct_streak = streak;
        }
        if let Some(total) = self.total_reviews {
            next.total_reviews = total;
        }
        if let Some(correct) = self.total_correct {
            next.total_correct = correct;
        }
        next
    }
}

/// `round(100 * part / whole)`, or 0 for an empty whole.
pub(crate) fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * f64::from(part) / f64::from(whole)).round() as u32
}
