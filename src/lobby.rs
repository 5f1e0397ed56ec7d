//! The shared chat room.
//!
//! [`Lobby`] owns the participant registry, the message store and the clock.
//! It is constructed once and shared by reference (`Arc<Lobby>`) between the
//! request handlers and the sweeper.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::chat::{
    is_reserved_name, Message, MessageKind, MessageStore, NewMessage, Recipient, EVERYONE,
};
use crate::clock::Clock;
use crate::db::{Database, MessageLogRepository};
use crate::presence::{Participant, ParticipantRegistry};
use crate::{ParlorError, Result};

/// A message submitted by a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessage {
    /// Recipient name, or `everyone`.
    pub to: String,
    /// Message body.
    pub text: String,
    /// Message kind. Only broadcast and direct messages can be sent.
    pub kind: MessageKind,
}

/// The single shared room.
pub struct Lobby {
    registry: ParticipantRegistry,
    store: MessageStore,
    clock: Arc<dyn Clock>,
    /// Serializes registry membership changes with their status notices.
    membership: Mutex<()>,
    /// Optional durable message log.
    database: Option<Database>,
}

impl Lobby {
    /// Create a room with in-memory history only.
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration, timezone: impl Into<String>) -> Self {
        Self {
            registry: ParticipantRegistry::new(Arc::clone(&clock), ttl),
            store: MessageStore::new(timezone),
            clock,
            membership: Mutex::new(()),
            database: None,
        }
    }

    /// Mirror every appended message into `database`.
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Replay the message log into the in-memory history.
    ///
    /// Returns the number of restored messages.
    pub async fn restore_history(&self) -> Result<usize> {
        let Some(db) = &self.database else {
            return Ok(0);
        };

        let messages = MessageLogRepository::new(db.pool()).load_all().await?;
        let count = messages.len();
        self.store.restore(messages).await;
        Ok(count)
    }

    /// Get the participant registry.
    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    /// Get the message store.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Register a participant and announce the join.
    ///
    /// Surrounding whitespace is stripped from `name`. Returns the join
    /// status message.
    pub async fn join(&self, name: &str) -> Result<Message> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParlorError::invalid("\"name\" is not allowed to be empty"));
        }
        if is_reserved_name(name) {
            return Err(ParlorError::invalid(format!(
                "\"name\" must not be \"{EVERYONE}\""
            )));
        }

        let (appended, joined) = {
            let _membership = self.membership.lock().await;

            let mut appended = Vec::with_capacity(2);
            if let Some(stale) = self.registry.join(name).await? {
                debug!(name = %stale.name, "Replaced expired participant");
                appended.push(
                    self.store
                        .append(NewMessage::left(stale.name), self.clock.now())
                        .await?,
                );
            }

            let joined = self
                .store
                .append(NewMessage::joined(name), self.clock.now())
                .await?;
            appended.push(joined.clone());
            (appended, joined)
        };

        self.mirror(&appended).await;
        info!(name = %name, "Participant joined");
        Ok(joined)
    }

    /// Refresh the liveness of `name`.
    pub async fn heartbeat(&self, name: &str) -> Result<()> {
        self.registry.heartbeat(name).await?;
        Ok(())
    }

    /// Snapshot of the registered participants.
    pub async fn participants(&self) -> Vec<Participant> {
        self.registry.list().await
    }

    /// Post a message from `from`.
    ///
    /// All field violations are reported together; the sender must be
    /// registered at the time of sending.
    pub async fn send(&self, from: &str, request: SendMessage) -> Result<Message> {
        let message = NewMessage::new(
            from,
            Recipient::parse(&request.to),
            request.text,
            request.kind,
        );

        let mut errors = match message.validate() {
            Ok(()) => Vec::new(),
            Err(ParlorError::Validation(errors)) => errors,
            Err(e) => return Err(e),
        };
        if !request.kind.is_sendable() {
            errors.push("\"type\" must be one of [message, private-message]".to_string());
        }
        if !errors.is_empty() {
            return Err(ParlorError::Validation(errors));
        }

        if !self.registry.contains(from).await {
            return Err(ParlorError::Conflict(format!(
                "sender '{from}' is not a registered participant"
            )));
        }

        let message = self.store.append(message, self.clock.now()).await?;
        self.mirror(std::slice::from_ref(&message)).await;
        Ok(message)
    }

    /// The last `limit` messages visible to `reader`.
    pub async fn messages(&self, reader: Option<&str>, limit: Option<i64>) -> Vec<Message> {
        self.store.query(reader, limit).await
    }

    /// Evict expired participants and announce each departure.
    ///
    /// Returns the evicted names in eviction order. The leave notices are
    /// appended before any join can claim an evicted name again. A notice
    /// that cannot be recorded is logged and does not stop the others.
    pub async fn sweep(&self) -> Vec<String> {
        let (evicted, appended) = {
            let _membership = self.membership.lock().await;

            let now = self.clock.now();
            let evicted = self
                .registry
                .sweep_expired(now, self.registry.ttl())
                .await;

            let mut appended = Vec::with_capacity(evicted.len());
            for name in &evicted {
                match self.store.append(NewMessage::left(name.as_str()), now).await {
                    Ok(message) => appended.push(message),
                    Err(e) => warn!(name = %name, error = %e, "Failed to record leave notice"),
                }
            }
            (evicted, appended)
        };

        self.mirror(&appended).await;
        evicted
    }

    /// Write appended messages to the message log, if one is configured.
    ///
    /// Called with no in-memory lock held.
    async fn mirror(&self, messages: &[Message]) {
        let Some(db) = &self.database else {
            return;
        };

        let repo = MessageLogRepository::new(db.pool());
        for message in messages {
            if let Err(e) = repo.save(message).await {
                warn!(id = message.id, error = %e, "Failed to write message log");
            }
        }
    }
}
