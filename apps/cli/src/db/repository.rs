//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use study_core::{Card, CardId, LifetimeStats};

type Result<T> = std::result::Result<T, DbError>;

/// Repository for card operations.
pub trait CardRepository {
    /// All cards, newest first.
    fn load_cards(&self) -> Result<Vec<Card>>;
    /// Insert a new card or overwrite an existing one, keeping its position.
    fn save_card(&self, card: &Card) -> Result<()>;
    fn delete_card(&self, id: CardId) -> Result<()>;
}

/// Repository for lifetime statistics.
pub trait StatsRepository {
    fn load_lifetime_stats(&self) -> Result<LifetimeStats>;
    fn save_lifetime_stats(&self, stats: &LifetimeStats) -> Result<()>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_LIFETIME_STATS)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Persist a graded card and the lifetime counters together.
    pub fn record_review(&self, card: &Card, stats: &LifetimeStats) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        self.save_card(card)?;
        self.save_lifetime_stats(stats)?;
        tx.commit()?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

/// Raw column values of a `cards` row.
struct CardRow {
    id: String,
    front: String,
    back: String,
    ease: f64,
    interval: u32,
    next_review: Option<String>,
    created: String,
    last_reviewed: Option<String>,
    correct_streak: u32,
    total_reviews: u32,
    total_correct: u32,
}

impl CardRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            front: row.get(1)?,
            back: row.get(2)?,
            ease: row.get(3)?,
            interval: row.get(4)?,
            next_review: row.get(5)?,
            created: row.get(6)?,
            last_reviewed: row.get(7)?,
            correct_streak: row.get(8)?,
            total_reviews: row.get(9)?,
            total_correct: row.get(10)?,
        })
    }

    fn into_card(self) -> Result<Card> {
        let id = self
            .id
            .parse::<CardId>()
            .map_err(|e| DbError::InvalidData(format!("card id {}: {e}", self.id)))?;
        Ok(Card {
            id,
            front: self.front,
            back: self.back,
            ease: self.ease,
            interval: self.interval,
            next_review: self.next_review.as_deref().map(parse_timestamp).transpose()?,
            created: parse_timestamp(&self.created)?,
            last_reviewed: self.last_reviewed.as_deref().map(parse_timestamp).transpose()?,
            correct_streak: self.correct_streak,
            total_reviews: self.total_reviews,
            total_correct: self.total_correct,
        })
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("timestamp {value}: {e}")))
}

impl CardRepository for SqliteRepository {
    fn load_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, front, back, ease, interval_days, next_review, created, last_reviewed,
                    correct_streak, total_reviews, total_correct
             FROM cards
             ORDER BY seq DESC",
        )?;

        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(CardRow::into_card).collect()
    }

    fn save_card(&self, card: &Card) -> Result<()> {
        self.conn.execute(
            "INSERT INTO cards (id, seq, front, back, ease, interval_days, next_review, created,
                                last_reviewed, correct_streak, total_reviews, total_correct)
             VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM cards), ?2, ?3, ?4, ?5, ?6, ?7,
                     ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
                front = excluded.front,
                back = excluded.back,
                ease = excluded.ease,
                interval_days = excluded.interval_days,
                next_review = excluded.next_review,
                last_reviewed = excluded.last_reviewed,
                correct_streak = excluded.correct_streak,
                total_reviews = excluded.total_reviews,
                total_correct = excluded.total_correct",
            params![
                card.id.to_string(),
                card.front,
                card.back,
                card.ease,
                card.interval,
                card.next_review.as_ref().map(format_timestamp),
                format_timestamp(&card.created),
                card.last_reviewed.as_ref().map(format_timestamp),
                card.correct_streak,
                card.total_reviews,
                card.total_correct,
            ],
        )?;
        Ok(())
    }

    fn delete_card(&self, id: CardId) -> Result<()> {
        self.conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }
}

impl StatsRepository for SqliteRepository {
    fn load_lifetime_stats(&self) -> Result<LifetimeStats> {
        let stats = self
            .conn
            .query_row(
                "SELECT cards_studied, correct_answers, streak, longest_streak
                 FROM lifetime_stats WHERE id = 1",
                [],
                |row| {
                    Ok(LifetimeStats {
                        cards_studied: row.get(0)?,
                        correct_answers: row.get(1)?,
                        streak: row.get(2)?,
                        longest_streak: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(stats.unwrap_or_default())
    }

    fn save_lifetime_stats(&self, stats: &LifetimeStats) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO lifetime_stats (id, cards_studied, correct_answers, streak, longest_streak)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                stats.cards_studied,
                stats.correct_answers,
                stats.streak,
                stats.longest_streak
            ],
        )?;
        Ok(())
    }
}
