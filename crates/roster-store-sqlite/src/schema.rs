//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Table and column names must agree
//! with the resource descriptors in `roster_core::resources`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS articles (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    url          TEXT NOT NULL,
    explanation  TEXT NOT NULL,
    email        TEXT NOT NULL,
    date_added   TEXT NOT NULL    -- ISO 8601 local date-time
);

CREATE TABLE IF NOT EXISTS helprequests (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    requester_email        TEXT NOT NULL,
    team_id                TEXT NOT NULL,
    table_or_breakout_room TEXT NOT NULL,
    request_time           TEXT NOT NULL,
    explanation            TEXT NOT NULL,
    solved                 INTEGER NOT NULL DEFAULT 0
);

-- item_id deliberately has no foreign key to ucsbdiningcommonsmenuitems.
CREATE TABLE IF NOT EXISTS menuitemreviews (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id        INTEGER NOT NULL,
    review_email   TEXT NOT NULL,
    stars          INTEGER NOT NULL,
    date_reviewed  TEXT NOT NULL,
    comments       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ucsbdiningcommonsmenuitems (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    dining_commons_code TEXT NOT NULL,
    name                TEXT NOT NULL,
    station             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recommendationrequests (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    requester_email TEXT NOT NULL,
    professor_email TEXT NOT NULL,
    explanation     TEXT NOT NULL,
    date_requested  TEXT NOT NULL,
    date_needed     TEXT NOT NULL,
    done            INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS ucsborganizations (
    org_code              TEXT PRIMARY KEY,
    org_translation_short TEXT NOT NULL,
    org_translation       TEXT NOT NULL,
    inactive              INTEGER NOT NULL DEFAULT 0
);

PRAGMA user_version = 1;
";
