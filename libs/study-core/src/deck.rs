//! Study deck: the entry points a host application calls.
//!
//! Each grade is applied as a single step. The grade is checked, the card is
//! rescheduled and stored, and only then are the session and lifetime
//! counters bumped and the cursor moved. A failure at any point leaves all of
//! them untouched.

use crate::algorithm::sm2::Sm2;
use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::due::{self, DueCursor};
use crate::error::{Result, StudyError};
use crate::stats::{LifetimeStats, SessionStats};
use crate::store::CardStore;
use crate::types::{Card, CardId, CardPatch, Grade};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything that changed because of one graded review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
    pub updated_card: Card,
    pub session: SessionStats,
    pub lifetime: LifetimeStats,
    /// Card presented after the cursor moved on.
    pub next_card: Option<Card>,
}

/// Figures for a stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub total_cards: usize,
    pub due_cards: usize,
    pub overall_accuracy: u32,
    pub streak: u32,
    pub longest_streak: u32,
    pub session_studied: u32,
    pub session_accuracy: u32,
}

pub struct StudyDeck {
    store: CardStore,
    cursor: DueCursor,
    session: SessionStats,
    scheduler: Box<dyn SpacedRepetitionAlgorithm>,
}

impl StudyDeck {
    pub fn new(store: CardStore, now: DateTime<Utc>) -> Self {
        Self::with_scheduler(store, Box::new(Sm2::default()), now)
    }

    pub fn with_scheduler(
        store: CardStore,
        scheduler: Box<dyn SpacedRepetitionAlgorithm>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            store,
            cursor: DueCursor::new(),
            session: SessionStats::new(now),
            scheduler,
        }
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn session(&self) -> &SessionStats {
        &self.session
    }

    pub fn cursor(&self) -> DueCursor {
        self.cursor
    }

    pub fn scheduler(&self) -> &dyn SpacedRepetitionAlgorithm {
        self.scheduler.as_ref()
    }

    pub fn add_card(&mut self, front: &str, back: &str, now: DateTime<Utc>) -> Result<Card> {
        let before = due::snapshot(self.store.cards(), now);
        let card = self.store.add(front, back, now)?.clone();
        self.cursor.follow(&before, self.store.cards(), now);
        tracing::debug!(card_id = %card.id, "added card");
        Ok(card)
    }

    /// Remove a card and keep the cursor pointing at a valid card.
    pub fn remove_card(&mut self, id: CardId, now: DateTime<Utc>) -> Result<Card> {
        self.cursor.settle(self.store.cards(), now);
        let before = due::snapshot(self.store.cards(), now);
        let removed = self.store.remove(id)?;
        let removed_at = before.iter().position(|other| *other == id);
        self.cursor
            .repair_after_removal(removed_at, self.store.cards(), now);
        tracing::debug!(card_id = %id, cursor = self.cursor.current_index(), "removed card");
        Ok(removed)
    }

    /// Replace the text of a card. Scheduling state is untouched.
    pub fn edit_card(&mut self, id: CardId, front: Option<&str>, back: Option<&str>) -> Result<Card> {
        let card = self.store.update(id, &CardPatch::text(front, back))?.clone();
        tracing::debug!(card_id = %id, "edited card");
        Ok(card)
    }

    /// Grade the presented card.
    pub fn grade_current_card(
        &mut self,
        grade: u8,
        now: DateTime<Utc>,
        lifetime: &mut LifetimeStats,
    ) -> Result<GradeOutcome> {
        let grade = Grade::try_from(grade)?;
        let id = self
            .current_card(now)
            .map(|card| card.id)
            .ok_or(StudyError::NoCurrentCard)?;
        self.apply_grade(id, grade, now, lifetime)
    }

    /// Grade a specific card, whether or not it is the presented one.
    pub fn grade_card(
        &mut self,
        id: CardId,
        grade: u8,
        now: DateTime<Utc>,
        lifetime: &mut LifetimeStats,
    ) -> Result<GradeOutcome> {
        let grade = Grade::try_from(grade)?;
        if self.store.get(id).is_none() {
            return Err(StudyError::NotFound(id));
        }
        self.apply_grade(id, grade, now, lifetime)
    }

    fn apply_grade(
        &mut self,
        id: CardId,
        grade: Grade,
        now: DateTime<Utc>,
        lifetime: &mut LifetimeStats,
    ) -> Result<GradeOutcome> {
        let card = self.store.get(id).ok_or(StudyError::NotFound(id))?;
        let result = self.scheduler.schedule(card, grade, now);
        self.cursor.settle(self.store.cards(), now);
        let before = due::snapshot(self.store.cards(), now);
        let presented = before.get(self.cursor.current_index()) == Some(&id);

        let updated_card = self
            .store
            .update(id, &CardPatch::schedule_of(&result.card))?
            .clone();

        self.session.record_review(result.is_correct);
        lifetime.record_review(result.is_correct);
        if presented {
            self.cursor
                .advance_after_review(&before, self.store.cards(), now);
        } else {
            self.cursor.follow(&before, self.store.cards(), now);
        }

        tracing::debug!(
            card_id = %id,
            grade = %grade,
            interval = updated_card.interval,
            ease = updated_card.ease,
            "graded card"
        );

        Ok(GradeOutcome {
            updated_card,
            session: self.session,
            lifetime: *lifetime,
            next_card: self.current_card(now).cloned(),
        })
    }

    /// Due cards at `now`, recomputed on every call.
    pub fn due_cards(&self, now: DateTime<Utc>) -> Vec<&Card> {
        due::due_cards(self.store.cards(), now)
    }

    pub fn current_card(&self, now: DateTime<Utc>) -> Option<&Card> {
        self.cursor.current(self.store.cards(), now)
    }

    /// Interval each grade would give the presented card.
    pub fn preview_grades(&self, now: DateTime<Utc>) -> Option<[(Grade, u32); 4]> {
        let card = self.current_card(now)?;
        Some(Grade::ALL.map(|grade| (grade, self.scheduler.preview_interval(card, grade))))
    }

    /// Start a new study session.
    pub fn reset_session(&mut self, now: DateTime<Utc>) {
        self.session.reset(now);
        self.cursor.reset();
    }

    pub fn summary(&self, now: DateTime<Utc>, lifetime: &LifetimeStats) -> DeckSummary {
        DeckSummary {
            total_cards: self.store.len(),
            due_cards: self.due_cards(now).len(),
            overall_accuracy: lifetime.overall_accuracy(),
            streak: lifetime.streak,
            longest_streak: lifetime.longest_streak,
            session_studied: self.session.studied,
            session_accuracy: self.session.accuracy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 7, 20, 0, 0).unwrap()
    }

    /// Deck whose presented order is card 1, card 2, ... card n.
    fn deck_of(n: usize) -> StudyDeck {
        let mut deck = StudyDeck::new(CardStore::new(), now());
        for i in (1..=n).rev() {
            deck.add_card(&format!("card {i}"), &format!("back {i}"), now())
                .unwrap();
        }
        deck.reset_session(now());
        deck
    }

    fn current_front(deck: &StudyDeck) -> Option<String> {
        deck.current_card(now()).map(|c| c.front.clone())
    }

    #[test]
    fn good_grade_schedules_three_days_out() {
        let mut deck = deck_of(1);
        let mut lifetime = LifetimeStats::default();

        let outcome = deck.grade_current_card(3, now(), &mut lifetime).unwrap();

        assert_eq!(outcome.updated_card.interval, 3);
        assert_eq!(outcome.updated_card.next_review, Some(now() + Duration::days(3)));
        assert_eq!(outcome.updated_card.ease, 2.5);
        assert_eq!(outcome.session.studied, 1);
        assert_eq!(outcome.session.correct, 1);
        assert_eq!(outcome.lifetime.cards_studied, 1);
        assert_eq!(lifetime, outcome.lifetime);
        assert_eq!(deck.store().cards()[0], outcome.updated_card);
    }

    #[test]
    fn grading_advances_then_deletion_clamps() {
        let mut deck = deck_of(3);
        let mut lifetime = LifetimeStats::default();
        assert_eq!(current_front(&deck).as_deref(), Some("card 1"));

        let outcome = deck.grade_current_card(3, now(), &mut lifetime).unwrap();
        assert_eq!(outcome.next_card.map(|c| c.front).as_deref(), Some("card 2"));
        assert_eq!(current_front(&deck).as_deref(), Some("card 2"));

        let card_2 = deck.current_card(now()).unwrap().id;
        deck.remove_card(card_2, now()).unwrap();
        assert_eq!(current_front(&deck).as_deref(), Some("card 3"));
        assert!(deck.cursor().current_index() < deck.due_cards(now()).len());
    }

    #[test]
    fn removing_last_card_reports_no_current_card() {
        let mut deck = deck_of(1);
        let id = deck.current_card(now()).unwrap().id;
        deck.remove_card(id, now()).unwrap();
        assert_eq!(deck.current_card(now()), None);
        assert_eq!(deck.cursor().current_index(), 0);

        let mut lifetime = LifetimeStats::default();
        assert_eq!(
            deck.grade_current_card(3, now(), &mut lifetime),
            Err(StudyError::NoCurrentCard)
        );
        assert_eq!(lifetime, LifetimeStats::default());
    }

    #[test]
    fn out_of_range_grade_changes_nothing() {
        let mut deck = deck_of(2);
        let mut lifetime = LifetimeStats::default();
        let cards_before = deck.store().clone();

        for bad in [0, 5, 255] {
            assert_eq!(
                deck.grade_current_card(bad, now(), &mut lifetime),
                Err(StudyError::GradeOutOfRange(bad))
            );
        }

        assert_eq!(deck.store(), &cards_before);
        assert_eq!(deck.session().studied, 0);
        assert_eq!(lifetime, LifetimeStats::default());
        assert_eq!(current_front(&deck).as_deref(), Some("card 1"));
    }

    #[test]
    fn grading_unknown_card_is_not_found() {
        let mut deck = deck_of(2);
        let mut lifetime = LifetimeStats::default();
        let missing = CardId::new();
        assert_eq!(
            deck.grade_card(missing, 4, now(), &mut lifetime),
            Err(StudyError::NotFound(missing))
        );
        assert_eq!(deck.session().studied, 0);
        assert_eq!(lifetime.cards_studied, 0);
    }

    #[test]
    fn removing_unknown_card_is_not_found() {
        let mut deck = deck_of(2);
        let missing = CardId::new();
        assert_eq!(deck.remove_card(missing, now()), Err(StudyError::NotFound(missing)));
        assert_eq!(deck.store().len(), 2);
    }

    #[test]
    fn empty_front_is_rejected() {
        let mut deck = deck_of(1);
        assert!(matches!(
            deck.add_card("  ", "back", now()),
            Err(StudyError::Validation(_))
        ));
        assert_eq!(deck.store().len(), 1);
    }

    #[test]
    fn adding_keeps_presented_card() {
        let mut deck = deck_of(3);
        let mut lifetime = LifetimeStats::default();
        deck.grade_current_card(3, now(), &mut lifetime).unwrap();
        assert_eq!(current_front(&deck).as_deref(), Some("card 2"));

        deck.add_card("card 0", "back 0", now()).unwrap();
        assert_eq!(current_front(&deck).as_deref(), Some("card 2"));
    }

    #[test]
    fn browse_fallback_after_everything_is_graded() {
        let mut deck = deck_of(2);
        let mut lifetime = LifetimeStats::default();

        deck.grade_current_card(4, now(), &mut lifetime).unwrap();
        deck.grade_current_card(1, now(), &mut lifetime).unwrap();

        assert!(deck.due_cards(now()).is_empty());
        assert!(deck.current_card(now()).is_some());

        // Browsing still records reviews.
        deck.grade_current_card(3, now(), &mut lifetime).unwrap();
        assert_eq!(lifetime.cards_studied, 3);
    }

    #[test]
    fn due_card_is_presented_after_browsing_past_the_due_set() {
        let mut deck = deck_of(3);
        let mut lifetime = LifetimeStats::default();
        for grade in [3, 3, 1] {
            deck.grade_current_card(grade, now(), &mut lifetime).unwrap();
        }
        assert!(deck.due_cards(now()).is_empty());
        assert_eq!(deck.cursor().current_index(), 1);

        let later = now() + Duration::days(1) + Duration::hours(1);
        let due: Vec<_> = deck.due_cards(later).iter().map(|c| c.front.clone()).collect();
        assert_eq!(due, vec!["card 3"]);
        assert_eq!(
            deck.current_card(later).map(|c| c.front.as_str()),
            Some("card 3")
        );
        assert!(deck.preview_grades(later).is_some());

        let outcome = deck.grade_current_card(3, later, &mut lifetime).unwrap();
        assert_eq!(outcome.updated_card.front, "card 3");
        assert_eq!(lifetime.cards_studied, 4);
    }

    #[test]
    fn removal_after_due_set_shrinks_keeps_a_valid_card() {
        let mut deck = deck_of(3);
        let mut lifetime = LifetimeStats::default();
        for grade in [3, 3, 1] {
            deck.grade_current_card(grade, now(), &mut lifetime).unwrap();
        }

        let later = now() + Duration::days(1) + Duration::hours(1);
        let card_1 = deck.store().cards()[0].id;
        deck.remove_card(card_1, later).unwrap();
        assert_eq!(deck.cursor().current_index(), 0);
        assert_eq!(
            deck.current_card(later).map(|c| c.front.as_str()),
            Some("card 3")
        );
    }

    #[test]
    fn invariants_hold_after_every_grade() {
        let mut deck = deck_of(4);
        let mut lifetime = LifetimeStats::default();
        let grades = [1, 2, 3, 4, 4, 4, 1, 3, 2, 4, 3, 3, 1, 4];
        for (step, grade) in grades.iter().enumerate() {
            let at = now() + Duration::hours(step as i64 * 20);
            deck.grade_current_card(*grade, at, &mut lifetime).unwrap();
            for card in deck.store().cards() {
                assert!(card.validate().is_ok());
            }
            assert!(lifetime.correct_answers <= lifetime.cards_studied);
            assert!(lifetime.streak <= lifetime.longest_streak);
            assert!(deck.session().correct <= deck.session().studied);
        }
        assert_eq!(deck.session().studied, grades.len() as u32);
    }

    #[test]
    fn lifetime_streak_scenario() {
        let mut deck = deck_of(3);
        let mut lifetime = LifetimeStats {
            cards_studied: 4,
            correct_answers: 4,
            streak: 4,
            longest_streak: 4,
        };

        deck.grade_current_card(2, now(), &mut lifetime).unwrap();
        assert_eq!((lifetime.streak, lifetime.longest_streak), (0, 4));

        deck.grade_current_card(3, now(), &mut lifetime).unwrap();
        assert_eq!((lifetime.streak, lifetime.longest_streak), (1, 4));
    }

    #[test]
    fn reset_session_restarts_counters_and_cursor() {
        let mut deck = deck_of(3);
        let mut lifetime = LifetimeStats::default();
        deck.grade_current_card(3, now(), &mut lifetime).unwrap();

        let later = now() + Duration::minutes(10);
        deck.reset_session(later);

        assert_eq!(deck.session(), &SessionStats::new(later));
        assert_eq!(deck.cursor().current_index(), 0);
        assert_eq!(lifetime.cards_studied, 1);
    }

    #[test]
    fn edit_changes_text_only() {
        let mut deck = deck_of(1);
        let mut lifetime = LifetimeStats::default();
        let id = deck.current_card(now()).unwrap().id;
        deck.grade_current_card(4, now(), &mut lifetime).unwrap();

        let edited = deck.edit_card(id, None, Some("new back")).unwrap();
        assert_eq!(edited.back, "new back");
        assert_eq!(edited.front, "card 1");
        assert_eq!(edited.total_reviews, 1);

        assert!(matches!(
            deck.edit_card(id, Some(""), None),
            Err(StudyError::Validation(_))
        ));
    }

    #[test]
    fn preview_lists_all_grades() {
        let deck = deck_of(1);
        let preview = deck.preview_grades(now()).unwrap();
        assert_eq!(
            preview,
            [
                (Grade::Again, 1),
                (Grade::Hard, 1),
                (Grade::Good, 3),
                (Grade::Easy, 3)
            ]
        );
    }

    #[test]
    fn summary_reflects_state() {
        let mut deck = deck_of(3);
        let mut lifetime = LifetimeStats::default();
        deck.grade_current_card(3, now(), &mut lifetime).unwrap();
        deck.grade_current_card(1, now(), &mut lifetime).unwrap();

        let summary = deck.summary(now(), &lifetime);
        assert_eq!(
            summary,
            DeckSummary {
                total_cards: 3,
                due_cards: 1,
                overall_accuracy: 50,
                streak: 0,
                longest_streak: 1,
                session_studied: 2,
                session_accuracy: 50,
            }
        );
    }
}
