//! Application state.

use crate::commands::CommandError;
use crate::db::{CardRepository, DbError, SqliteRepository, StatsRepository};
use chrono::{DateTime, Utc};
use study_core::{CardStore, LifetimeStats, StudyDeck};

/// Everything the shell works on. Owned by a single learner session.
pub struct AppState {
    pub repository: SqliteRepository,
    pub deck: StudyDeck,
    pub lifetime: LifetimeStats,
}

impl AppState {
    /// Load cards and lifetime stats from storage.
    pub fn load(repository: SqliteRepository, now: DateTime<Utc>) -> Result<Self, CommandError> {
        let cards = repository.load_cards()?;
        let lifetime = repository.load_lifetime_stats()?;
        let store = CardStore::from_cards(cards)?;
        tracing::info!(
            cards = store.len(),
            cards_studied = lifetime.cards_studied,
            "loaded deck"
        );

        Ok(Self {
            repository,
            deck: StudyDeck::new(store, now),
            lifetime,
        })
    }

    /// Log a failed write. The in-memory state stays authoritative.
    pub(crate) fn persist(&self, action: &str, result: Result<(), DbError>) {
        if let Err(e) = result {
            tracing::warn!(action, error = %e, "failed to persist change");
        }
    }
}
