//! SQL schema for the jokes SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids of deleted jokes from being handed out again.
CREATE TABLE IF NOT EXISTS Joke (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    JokeQuestion TEXT NOT NULL,
    JokeAnswer   TEXT NOT NULL
);

PRAGMA user_version = 1;
";
