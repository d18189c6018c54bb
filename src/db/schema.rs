//! SQL DDL for initializing the storage.
//! Both tables are created if absent; there are no migrations.

/// SQLite schema with:
/// - `users`: `username` PRIMARY KEY, clear-text `password`
/// - `sentiment_data`: append-only analysis log, `id` INTEGER PRIMARY KEY AUTOINCREMENT
///
/// `sentiment_data.username` is not a foreign key; it names whoever was logged in
/// when the row was written.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT
);

CREATE TABLE IF NOT EXISTS sentiment_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT,
    text TEXT,
    prediction TEXT,
    confidence REAL,
    timestamp TEXT -- local time, %Y-%m-%d %H:%M:%S
);
"#;

/// Column order of `sentiment_data`, also used as the CSV header.
pub const HISTORY_COLUMNS: [&str; 6] = [
    "id",
    "username",
    "text",
    "prediction",
    "confidence",
    "timestamp",
];
