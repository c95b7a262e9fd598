//! Statistics commands.

use crate::state::AppState;
use chrono::{DateTime, Utc};
use study_core::{DeckSummary, LifetimeStats, SessionStats};

#[derive(Debug, Clone, serde::Serialize)]
pub struct StudyStats {
    pub summary: DeckSummary,
    pub session: SessionStats,
    pub lifetime: LifetimeStats,
    pub session_minutes: i64,
}

/// Get deck, session and lifetime statistics.
pub fn get_study_stats(state: &AppState, now: DateTime<Utc>) -> StudyStats {
    let session = *state.deck.session();
    StudyStats {
        summary: state.deck.summary(now, &state.lifetime),
        session,
        lifetime: state.lifetime,
        session_minutes: session.elapsed(now).num_minutes(),
    }
}
