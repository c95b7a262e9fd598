//! Simplified SM-2 spaced repetition algorithm.
//!
//! Ease is nudged by each grade and multiplies the previous interval, so
//! well-known cards come back exponentially less often while failed cards are
//! pinned to a one day interval.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{Card, Grade, EASE_CEILING, EASE_FLOOR};
use chrono::{DateTime, Days, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub minimum_ease: f64,
    pub maximum_ease: f64,
    /// Ease lost on Again or Hard.
    pub lapse_penalty: f64,
    /// Extra interval multiplier on Easy.
    pub easy_bonus: f64,
    /// Ease gained on Easy.
    pub easy_ease_bonus: f64,
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            minimum_ease: EASE_FLOOR,
            maximum_ease: EASE_CEILING,
            lapse_penalty: 0.2,
            easy_bonus: 1.3,
            easy_ease_bonus: 0.15,
            maximum_interval: 36500,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn schedule(&self, card: &Card, grade: Grade, now: DateTime<Utc>) -> SchedulingResult {
        let (interval, ease) = self.next_interval_and_ease(card, grade);
        let next_review = add_calendar_days(now, interval);
        let is_correct = grade.is_correct();

        let mut updated = card.clone();
        updated.ease = ease;
        updated.interval = interval;
        updated.next_review = Some(next_review);
        updated.last_reviewed = Some(now);
        updated.correct_streak = if is_correct {
            card.correct_streak.saturating_add(1)
        } else {
            0
        };
        updated.total_reviews = card.total_reviews.saturating_add(1);
        updated.total_correct = card.total_correct.saturating_add(u32::from(is_correct));

        SchedulingResult {
            card: updated,
            next_review,
            is_correct,
        }
    }

    fn preview_interval(&self, card: &Card, grade: Grade) -> u32 {
        self.next_interval_and_ease(card, grade).0
    }
}

impl Sm2 {
    fn next_interval_and_ease(&self, card: &Card, grade: Grade) -> (u32, f64) {
        let interval = f64::from(card.interval);
        let (raw_interval, ease) = match grade {
            Grade::Again | Grade::Hard => (1.0, card.ease - self.lapse_penalty),
            Grade::Good => ((interval * card.ease).round(), card.ease),
            Grade::Easy => (
                (interval * card.ease * self.easy_bonus).round(),
                card.ease + self.easy_ease_bonus,
            ),
        };

        let interval = raw_interval.clamp(1.0, f64::from(self.maximum_interval.max(1))) as u32;
        let ease = ease.clamp(self.minimum_ease, self.maximum_ease);
        (interval, ease)
    }
}

/// Add whole calendar days, saturating at the latest representable instant.
fn add_calendar_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 18, 30, 0).unwrap()
    }

    fn card(ease: f64, interval: u32) -> Card {
        let mut card = Card::new("q", "a", now()).unwrap();
        card.ease = ease;
        card.interval = interval;
        card
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn good_on_new_card_multiplies_by_ease() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&card(2.5, 1), Grade::Good, now());
        assert_eq!(result.card.interval, 3);
        assert_eq!(result.next_review, now() + Duration::days(3));
        assert_eq!(result.card.next_review, Some(result.next_review));
        assert_close(result.card.ease, 2.5);
    }

    #[test]
    fn easy_applies_bonus_and_raises_ease() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&card(2.5, 3), Grade::Easy, now());
        assert_eq!(result.card.interval, 10);
        assert_close(result.card.ease, 2.65);
    }

    #[test]
    fn again_resets_interval_and_floors_ease() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&card(1.4, 5), Grade::Again, now());
        assert_eq!(result.card.interval, 1);
        assert_close(result.card.ease, 1.3);
    }

    #[test]
    fn hard_behaves_like_again() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&card(2.5, 40), Grade::Hard, now());
        assert_eq!(result.card.interval, 1);
        assert_close(result.card.ease, 2.3);
        assert!(!result.is_correct);
    }

    #[test]
    fn again_always_resets_interval() {
        let sm2 = Sm2::default();
        for interval in [1, 2, 17, 365, 36500] {
            let result = sm2.schedule(&card(2.0, interval), Grade::Again, now());
            assert_eq!(result.card.interval, 1);
        }
    }

    #[test]
    fn ease_never_exceeds_ceiling() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&card(2.95, 2), Grade::Easy, now());
        assert_close(result.card.ease, 3.0);
    }

    #[test]
    fn easy_beats_good_for_same_state() {
        let sm2 = Sm2::default();
        for (ease, interval) in [(1.3, 1), (2.0, 4), (2.5, 3), (2.99, 12), (3.0, 100)] {
            let c = card(ease, interval);
            let good = sm2.schedule(&c, Grade::Good, now());
            let easy = sm2.schedule(&c, Grade::Easy, now());
            assert!(easy.card.interval >= good.card.interval);
            if ease < 3.0 {
                assert!(easy.card.ease > c.ease);
            }
        }
    }

    #[test]
    fn invariants_hold_over_long_sequences() {
        let sm2 = Sm2::default();
        let mut c = card(2.5, 1);
        let grades = [4, 4, 1, 3, 2, 4, 4, 4, 3, 1, 1, 1, 1, 1, 3, 4, 4, 4, 4, 4, 4, 4];
        for (i, value) in grades.iter().enumerate() {
            let grade = Grade::from_value(*value).unwrap();
            c = sm2.schedule(&c, grade, now() + Duration::days(i as i64)).card;
            assert!((EASE_FLOOR..=EASE_CEILING).contains(&c.ease));
            assert!(c.interval >= 1);
            assert!(c.interval <= sm2.maximum_interval);
            assert!(c.total_correct <= c.total_reviews);
        }
        assert_eq!(c.total_reviews, grades.len() as u32);
    }

    #[test]
    fn counters_follow_grade() {
        let sm2 = Sm2::default();
        let mut c = card(2.5, 1);
        c.correct_streak = 2;
        c.total_reviews = 4;
        c.total_correct = 3;

        let good = sm2.schedule(&c, Grade::Good, now()).card;
        assert_eq!(good.correct_streak, 3);
        assert_eq!(good.total_reviews, 5);
        assert_eq!(good.total_correct, 4);
        assert_eq!(good.last_reviewed, Some(now()));

        let again = sm2.schedule(&good, Grade::Again, now()).card;
        assert_eq!(again.correct_streak, 0);
        assert_eq!(again.total_reviews, 6);
        assert_eq!(again.total_correct, 4);
    }

    #[test]
    fn schedule_does_not_touch_identity_or_text() {
        let sm2 = Sm2::default();
        let c = card(2.5, 1);
        let result = sm2.schedule(&c, Grade::Good, now());
        assert_eq!(result.card.id, c.id);
        assert_eq!(result.card.front, c.front);
        assert_eq!(result.card.created, c.created);
    }

    #[test]
    fn next_review_crosses_month_and_year() {
        let sm2 = Sm2::default();
        let new_year_eve = Utc.with_ymd_and_hms(2023, 12, 30, 23, 0, 0).unwrap();
        let result = sm2.schedule(&card(2.5, 1), Grade::Good, new_year_eve);
        assert_eq!(
            result.next_review,
            Utc.with_ymd_and_hms(2024, 1, 2, 23, 0, 0).unwrap()
        );

        let leap = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
        let result = sm2.schedule(&card(1.3, 1), Grade::Again, leap);
        assert_eq!(
            result.next_review,
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn interval_is_capped() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&card(3.0, 30000), Grade::Easy, now());
        assert_eq!(result.card.interval, sm2.maximum_interval);
    }

    #[test]
    fn preview_matches_schedule() {
        let sm2 = Sm2::default();
        let c = card(2.2, 6);
        for grade in Grade::ALL {
            assert_eq!(
                sm2.preview_interval(&c, grade),
                sm2.schedule(&c, grade, now()).card.interval
            );
        }
    }
}
