//! Ordered, in-memory collection of cards.
//!
//! The store only computes the next state of the collection. Making each
//! mutation durable is the caller's job.

use crate::error::{Result, StudyError};
use crate::types::{Card, CardId, CardPatch};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Cards in newest-first order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardStore {
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously persisted cards, keeping their order.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            card.validate()?;
            if !seen.insert(card.id) {
                return Err(StudyError::Validation(format!("duplicate card id {}", card.id)));
            }
        }
        Ok(Self { cards })
    }

    /// Create a card and insert it at the front of the collection.
    pub fn add(&mut self, front: &str, back: &str, now: DateTime<Utc>) -> Result<&Card> {
        let card = Card::new(front, back, now)?;
        self.cards.insert(0, card);
        Ok(&self.cards[0])
    }

    /// Remove a card, returning it.
    pub fn remove(&mut self, id: CardId) -> Result<Card> {
        let index = self.position(id).ok_or(StudyError::NotFound(id))?;
        Ok(self.cards.remove(index))
    }

    /// Apply `patch` to one card. The patched card must still satisfy the
    /// card invariants, otherwise the store is left unchanged.
    pub fn update(&mut self, id: CardId, patch: &CardPatch) -> Result<&Card> {
        let index = self.position(id).ok_or(StudyError::NotFound(id))?;
        let patched = patch.apply(&self.cards[index]);
        patched.validate()?;
        self.cards[index] = patched;
        Ok(&self.cards[index])
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
