//! Due-set selection and the cursor over the presented cards.
//!
//! The presented view is the due subset when anything is due, otherwise the
//! whole collection so the learner can still browse the deck.

use crate::types::{Card, CardId};
use chrono::{DateTime, Utc};

/// Cards due at `now`, in collection order.
pub fn due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<&Card> {
    cards.iter().filter(|card| card.is_due(now)).collect()
}

/// The due subset, or every card when nothing is due.
pub fn presented_view(cards: &[Card], now: DateTime<Utc>) -> Vec<&Card> {
    let due = due_cards(cards, now);
    if due.is_empty() {
        cards.iter().collect()
    } else {
        due
    }
}

/// Ids of the presented view, for comparing before and after a mutation.
pub fn snapshot(cards: &[Card], now: DateTime<Utc>) -> Vec<CardId> {
    presented_view(cards, now).iter().map(|card| card.id).collect()
}

/// Index of the presented card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueCursor {
    current_index: usize,
}

impl DueCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// The presented card, if any. Only an empty view has none.
    pub fn current<'a>(&self, cards: &'a [Card], now: DateTime<Utc>) -> Option<&'a Card> {
        let view = presented_view(cards, now);
        view.get(self.index_in(view.len())).copied()
    }

    /// Pull an index left behind by a shrinking view back to the first card.
    ///
    /// The view depends on `now`, so it can shrink between mutations without
    /// the cursor being told.
    pub fn settle(&mut self, cards: &[Card], now: DateTime<Utc>) {
        self.current_index = self.index_in(presented_view(cards, now).len());
    }

    fn index_in(&self, len: usize) -> usize {
        if self.current_index < len {
            self.current_index
        } else {
            0
        }
    }

    /// Move past the card that was just graded.
    ///
    /// `before` is the presented view captured before the review; `cards` is
    /// the collection after it.
    pub fn advance_after_review(&mut self, before: &[CardId], cards: &[Card], now: DateTime<Utc>) {
        let after = presented_view(cards, now);
        let index = self.index_in(before.len());
        let next = if before.len() > 1 {
            let target = before[(index + 1) % before.len()];
            after
                .iter()
                .position(|card| card.id == target)
                .unwrap_or(index + 1)
        } else if cards.len() > 1 {
            (index + 1) % cards.len()
        } else {
            0
        };
        self.current_index = if next < after.len() { next } else { 0 };
    }

    /// Keep presenting the same card after the view changed around it, or
    /// fall back to the first card when it is no longer presented.
    pub fn follow(&mut self, before: &[CardId], cards: &[Card], now: DateTime<Utc>) {
        let presented = before.get(self.index_in(before.len())).copied();
        self.current_index = presented
            .and_then(|id| presented_view(cards, now).iter().position(|card| card.id == id))
            .unwrap_or(0);
    }

    /// Keep the cursor in bounds after a card left the collection.
    ///
    /// `removed_at` is where the removed card sat in the presented view before
    /// removal, if it was part of it.
    pub fn repair_after_removal(
        &mut self,
        removed_at: Option<usize>,
        cards: &[Card],
        now: DateTime<Utc>,
    ) {
        if let Some(position) = removed_at {
            if position < self.current_index {
                self.current_index -= 1;
            }
        }
        if self.current_index >= presented_view(cards, now).len() {
            self.current_index = 0;
        }
    }
}
