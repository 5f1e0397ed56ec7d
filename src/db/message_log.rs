//! Message log storage.
//!
//! Mirrors the in-memory room history into SQLite so it survives restarts.

use chrono::{DateTime, Utc};

use super::DbPool;
use crate::chat::{Message, MessageKind, Recipient};
use crate::{ParlorError, Result};

/// Database row type for Message.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    sender: String,
    recipient: String,
    text: String,
    kind: String,
    time: String,
    created_at: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = ParlorError;

    fn try_from(row: MessageRow) -> Result<Self> {
        let kind = MessageKind::from_wire(&row.kind).ok_or_else(|| {
            ParlorError::Database(format!("unknown message kind '{}'", row.kind))
        })?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                ParlorError::Database(format!(
                    "invalid created_at '{}' for message {}: {e}",
                    row.created_at, row.id
                ))
            })?;

        Ok(Self {
            id: row.id as u64,
            from: row.sender,
            to: Recipient::parse(&row.recipient),
            text: row.text,
            kind,
            time: row.time,
            created_at,
        })
    }
}

/// Repository for message log operations.
pub struct MessageLogRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MessageLogRepository<'a> {
    /// Create a new MessageLogRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Save a message.
    pub async fn save(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender, recipient, text, kind, time, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.id as i64)
        .bind(&message.from)
        .bind(message.to.as_str())
        .bind(&message.text)
        .bind(message.kind.as_str())
        .bind(&message.time)
        .bind(message.created_at.to_rfc3339())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Load the whole log in id order.
    pub async fn load_all(&self) -> Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, sender, recipient, text, kind, time, created_at
            FROM messages
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    /// Count logged messages.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }
}
