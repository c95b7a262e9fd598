//! Session and lifetime review counters.

use crate::types::percent;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Counters for the current study session. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub studied: u32,
    pub correct: u32,
    pub start_time: DateTime<Utc>,
}

impl SessionStats {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            studied: 0,
            correct: 0,
            start_time: now,
        }
    }

    /// Start a fresh session at `now`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now);
    }

    pub fn record_review(&mut self, is_correct: bool) {
        self.studied = self.studied.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Whole-percent accuracy; 0 before the first review.
    pub fn accuracy(&self) -> u32 {
        percent(self.correct, self.studied)
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).max(Duration::zero())
    }
}

/// Cross-session counters, persisted by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub cards_studied: u32,
    pub correct_answers: u32,
    pub streak: u32,
    pub longest_streak: u32,
}

impl LifetimeStats {
    /// Count one graded review. Must run exactly once per review, in the
    /// same step as the card update.
    pub fn record_review(&mut self, is_correct: bool) {
        self.cards_studied = self.cards_studied.saturating_add(1);
        if is_correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 0;
        }
        self.longest_streak = self.longest_streak.max(self.streak);
    }

    pub fn overall_accuracy(&self) -> u32 {
        percent(self.correct_answers, self.cards_studied)
    }
}
