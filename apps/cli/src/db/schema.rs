//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local database.
pub const SCHEMA: &str = r#"
-- Cards with their scheduling state. `seq` records insertion order.
CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY,
    seq INTEGER NOT NULL,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    ease REAL NOT NULL DEFAULT 2.5,
    interval_days INTEGER NOT NULL DEFAULT 1,
    next_review TEXT,
    created TEXT NOT NULL,
    last_reviewed TEXT,
    correct_streak INTEGER NOT NULL DEFAULT 0,
    total_reviews INTEGER NOT NULL DEFAULT 0,
    total_correct INTEGER NOT NULL DEFAULT 0
);

-- Cross-session counters
CREATE TABLE IF NOT EXISTS lifetime_stats (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    cards_studied INTEGER NOT NULL DEFAULT 0,
    correct_answers INTEGER NOT NULL DEFAULT 0,
    streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_cards_seq ON cards(seq);
CREATE INDEX IF NOT EXISTS idx_cards_next_review ON cards(next_review);
"#;

/// Initialize lifetime stats if not exists.
pub const INIT_LIFETIME_STATS: &str = r#"
INSERT OR IGNORE INTO lifetime_stats (id) VALUES (1);
"#;
