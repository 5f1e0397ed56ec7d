//! Chat message model.

use chrono::{DateTime, Utc};

use crate::{ParlorError, Result};

/// Wire name of the broadcast recipient.
pub const EVERYONE: &str = "everyone";

/// Whether `name` collides with the broadcast sentinel in any letter case.
pub fn is_reserved_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(EVERYONE)
}

/// Status text appended when a participant joins.
pub const JOIN_TEXT: &str = "joined the room";

/// Status text appended when a participant is evicted.
pub const LEAVE_TEXT: &str = "left the room";

/// Kind of chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Public message, visible to every reader.
    Broadcast,
    /// Private message between two participants.
    Direct,
    /// Synthetic join/leave notice.
    Status,
}

impl MessageKind {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Broadcast => "message",
            MessageKind::Direct => "private-message",
            MessageKind::Status => "status",
        }
    }

    /// Parse a wire name.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "message" => Some(MessageKind::Broadcast),
            "private-message" => Some(MessageKind::Direct),
            "status" => Some(MessageKind::Status),
            _ => None,
        }
    }

    /// Whether participants may send messages of this kind.
    pub fn is_sendable(&self) -> bool {
        !matches!(self, MessageKind::Status)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recipient of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// The whole room.
    Everyone,
    /// A single participant, by name.
    Participant(String),
}

impl Recipient {
    /// Parse a recipient name; only the exact `everyone` sentinel maps to
    /// [`Recipient::Everyone`].
    pub fn parse(name: &str) -> Self {
        if name == EVERYONE {
            Recipient::Everyone
        } else {
            Recipient::Participant(name.to_string())
        }
    }

    /// Get the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Recipient::Everyone => EVERYONE,
            Recipient::Participant(name) => name,
        }
    }

    /// Whether this recipient addresses `reader`.
    pub fn includes(&self, reader: &str) -> bool {
        match self {
            Recipient::Everyone => true,
            Recipient::Participant(name) => name == reader,
        }
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message stored in the room history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Append sequence number.
    pub id: u64,
    /// Sender name.
    pub from: String,
    /// Recipient.
    pub to: Recipient,
    /// Message body.
    pub text: String,
    /// Message kind.
    pub kind: MessageKind,
    /// Wall-clock time (`HH:MM:SS`) assigned at append.
    pub time: String,
    /// Full timestamp of the append.
    pub created_at: DateTime<Utc>,
}

/// A message waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Sender name.
    pub from: String,
    /// Recipient.
    pub to: Recipient,
    /// Message body.
    pub text: String,
    /// Message kind.
    pub kind: MessageKind,
}

impl NewMessage {
    /// Create a new message.
    pub fn new(
        from: impl Into<String>,
        to: Recipient,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> Self {
        Self {
            from: from.into(),
            to,
            text: text.into(),
            kind,
        }
    }

    /// Create a public message.
    pub fn broadcast(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(from, Recipient::Everyone, text, MessageKind::Broadcast)
    }

    /// Create a private message.
    pub fn direct(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            from,
            Recipient::Participant(to.into()),
            text,
            MessageKind::Direct,
        )
    }

    /// Create a join notice.
    pub fn joined(name: impl Into<String>) -> Self {
        Self::new(name, Recipient::Everyone, JOIN_TEXT, MessageKind::Status)
    }

    /// Create a leave notice.
    pub fn left(name: impl Into<String>) -> Self {
        Self::new(name, Recipient::Everyone, LEAVE_TEXT, MessageKind::Status)
    }

    /// Check the message shape, reporting every violated field.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.from.trim().is_empty() {
            errors.push("\"from\" is not allowed to be empty".to_string());
        }
        if let Recipient::Participant(name) = &self.to {
            if name.trim().is_empty() {
                errors.push("\"to\" is not allowed to be empty".to_string());
            }
        }
        if self.text.trim().is_empty() {
            errors.push("\"text\" is not allowed to be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ParlorError::Validation(errors))
        }
    }
}
