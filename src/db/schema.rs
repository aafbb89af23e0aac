pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA_V1: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS friends (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- birth_date is a pure calendar date (YYYY-MM-DD). When birth_year is NULL
-- the year part of birth_date is a placeholder.
CREATE TABLE IF NOT EXISTS birthdays (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    friend_id INTEGER NOT NULL,
    birth_date TEXT NOT NULL,
    birth_year INTEGER,
    reminder_days INTEGER NOT NULL DEFAULT 7 CHECK(reminder_days >= 0),
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (friend_id) REFERENCES friends(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_birthday_friend ON birthdays(friend_id);
CREATE INDEX IF NOT EXISTS idx_birthday_date ON birthdays(birth_date);
CREATE INDEX IF NOT EXISTS idx_birthday_active ON birthdays(is_active);

-- Key/value settings (default reminder days, week start, ...)
CREATE TABLE IF NOT EXISTS app_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
