//! Deck-related commands: adding, editing, removing and listing cards.

use crate::db::CardRepository;
use crate::state::AppState;
use chrono::{DateTime, Utc};
use study_core::{Card, CardId, LifetimeStats};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<study_core::StudyError> for CommandError {
    fn from(e: study_core::StudyError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        Self { message: e.to_string() }
    }
}

/// Full deck contents, as written by `export`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct DeckExport {
    pub cards: Vec<Card>,
    pub lifetime: LifetimeStats,
}

/// Resolve a full card id or a unique prefix of one.
pub fn resolve_card_id(state: &AppState, needle: &str) -> Result<CardId, CommandError> {
    let needle = needle.trim();
    if let Ok(id) = needle.parse::<CardId>() {
        return Ok(id);
    }
    if needle.is_empty() {
        return Err(CommandError::new("card id is required"));
    }

    let needle = needle.to_lowercase();
    let mut matches = state
        .deck
        .store()
        .cards()
        .iter()
        .filter(|card| card.id.to_string().starts_with(&needle));

    match (matches.next(), matches.next()) {
        (Some(card), None) => Ok(card.id),
        (Some(_), Some(_)) => Err(CommandError::new(format!(
            "card id prefix '{needle}' is ambiguous"
        ))),
        (None, _) => Err(CommandError::new(format!("no card matches '{needle}'"))),
    }
}

/// Add a new card, due immediately.
pub fn add_card(
    state: &mut AppState,
    front: &str,
    back: &str,
    now: DateTime<Utc>,
) -> Result<Card, CommandError> {
    let card = state.deck.add_card(front, back, now)?;
    state.persist("add card", state.repository.save_card(&card));
    Ok(card)
}

/// Remove a card by id or id prefix.
pub fn remove_card(
    state: &mut AppState,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Card, CommandError> {
    let id = resolve_card_id(state, id)?;
    let removed = state.deck.remove_card(id, now)?;
    state.persist("remove card", state.repository.delete_card(id));
    Ok(removed)
}

/// Replace the text on one or both sides of a card.
pub fn edit_card(
    state: &mut AppState,
    id: &str,
    front: Option<&str>,
    back: Option<&str>,
) -> Result<Card, CommandError> {
    let id = resolve_card_id(state, id)?;
    let card = state.deck.edit_card(id, front, back)?;
    state.persist("edit card", state.repository.save_card(&card));
    Ok(card)
}

/// All cards, newest first.
pub fn list_cards(state: &AppState) -> Vec<Card> {
    state.deck.store().cards().to_vec()
}

/// Serialize the whole deck and lifetime stats as pretty JSON.
pub fn export_deck(state: &AppState) -> Result<String, CommandError> {
    let export = DeckExport {
        cards: list_cards(state),
        lifetime: state.lifetime,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
