//! Study session commands.

use crate::state::AppState;
use chrono::{DateTime, Utc};
use study_core::{Card, Grade, GradeOutcome};

use super::deck::CommandError;

#[derive(Debug, serde::Serialize)]
pub struct GradePreview {
    pub grade: Grade,
    pub value: u8,
    pub interval_days: u32,
}

/// Cards due at `now`, in deck order.
pub fn get_due_cards(state: &AppState, now: DateTime<Utc>) -> Vec<Card> {
    state.deck.due_cards(now).into_iter().cloned().collect()
}

/// The card currently presented to the learner.
pub fn get_current_card(state: &AppState, now: DateTime<Utc>) -> Option<Card> {
    state.deck.current_card(now).cloned()
}

/// Enter study mode: fresh session counters, cursor back at the start.
pub fn start_study(state: &mut AppState, now: DateTime<Utc>) -> Option<Card> {
    state.deck.reset_session(now);
    tracing::info!(due = state.deck.due_cards(now).len(), "study session started");
    get_current_card(state, now)
}

/// Grade the presented card and persist the card with the lifetime stats.
pub fn grade_current_card(
    state: &mut AppState,
    grade: u8,
    now: DateTime<Utc>,
) -> Result<GradeOutcome, CommandError> {
    let outcome = state
        .deck
        .grade_current_card(grade, now, &mut state.lifetime)?;
    state.persist(
        "record review",
        state
            .repository
            .record_review(&outcome.updated_card, &outcome.lifetime),
    );
    Ok(outcome)
}

/// Intervals each grade would give the presented card.
pub fn preview_grades(state: &AppState, now: DateTime<Utc>) -> Vec<GradePreview> {
    state
        .deck
        .preview_grades(now)
        .map(|previews| {
            previews
                .into_iter()
                .map(|(grade, interval_days)| GradePreview {
                    grade,
                    value: grade.to_value(),
                    interval_days,
                })
                .collect()
        })
        .unwrap_or_default()
}
