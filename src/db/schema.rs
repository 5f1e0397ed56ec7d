//! Database schema and migrations for Parlor.
//!
//! Migrations are applied in order when the database is opened.
//! The schema_version table tracks which migrations have been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Message log
    r#"
-- Append-only room history; ids are assigned by the in-memory store
CREATE TABLE messages (
    id          INTEGER PRIMARY KEY,
    sender      TEXT NOT NULL,
    recipient   TEXT NOT NULL,           -- participant name or 'everyone'
    text        TEXT NOT NULL,
    kind        TEXT NOT NULL,           -- 'message', 'private-message', 'status'
    time        TEXT NOT NULL,           -- HH:MM:SS as shown to clients
    created_at  TEXT NOT NULL            -- RFC3339
);
"#,
];
