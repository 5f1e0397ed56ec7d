//! Append-only message store.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::message::{Message, NewMessage};
use super::visibility::is_visible;
use crate::datetime::format_clock_time;
use crate::Result;

#[derive(Debug)]
struct StoreInner {
    messages: Vec<Message>,
    next_id: u64,
}

/// In-memory, append-only room history.
///
/// Appends take the write lock for the duration of a push; queries copy the
/// visible suffix under the read lock.
#[derive(Debug)]
pub struct MessageStore {
    inner: RwLock<StoreInner>,
    /// Timezone used to render `Message::time`.
    timezone: String,
}

impl MessageStore {
    /// Create an empty store rendering times in `timezone`.
    pub fn new(timezone: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                messages: Vec::new(),
                next_id: 1,
            }),
            timezone: timezone.into(),
        }
    }

    /// Validate and append a message stamped with `at`.
    pub async fn append(&self, new: NewMessage, at: DateTime<Utc>) -> Result<Message> {
        new.validate()?;

        let time = format_clock_time(&at, &self.timezone);

        let mut inner = self.inner.write().await;
        let message = Message {
            id: inner.next_id,
            from: new.from,
            to: new.to,
            text: new.text,
            kind: new.kind,
            time,
            created_at: at,
        };
        inner.next_id += 1;
        inner.messages.push(message.clone());

        Ok(message)
    }

    /// Get the last `limit` messages visible to `reader`, oldest first.
    ///
    /// A missing or non-positive `limit` returns the whole visible history.
    pub async fn query(&self, reader: Option<&str>, limit: Option<i64>) -> Vec<Message> {
        let limit = match limit {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => usize::MAX,
        };

        let inner = self.inner.read().await;
        let mut visible: Vec<Message> = inner
            .messages
            .iter()
            .rev()
            .filter(|m| is_visible(m, reader))
            .take(limit)
            .cloned()
            .collect();
        drop(inner);

        visible.reverse();
        visible
    }

    /// Load previously recorded history.
    ///
    /// Messages are kept in id order and new appends continue after the
    /// highest restored id.
    pub async fn restore(&self, mut messages: Vec<Message>) {
        messages.sort_by_key(|m| m.id);

        let mut inner = self.inner.write().await;
        if let Some(last) = messages.last() {
            inner.next_id = inner.next_id.max(last.id + 1);
        }
        inner.messages.extend(messages);
        inner.messages.sort_by_key(|m| m.id);
    }

    /// Number of stored messages.
    pub async fn len(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.messages.is_empty()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new("UTC")
    }
}
