//! Response DTOs for Web API.

use serde::Serialize;

use crate::chat::Message;
use crate::presence::Participant;

/// Participant list item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    /// Display name.
    pub name: String,
    /// Last join or heartbeat, in milliseconds since the Unix epoch.
    pub last_seen: i64,
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.clone(),
            last_seen: participant.last_seen.timestamp_millis(),
        }
    }
}

/// Message list item.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Sender name.
    pub from: String,
    /// Recipient name, or `everyone`.
    pub to: String,
    /// Message body.
    pub text: String,
    /// `message`, `private-message` or `status`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Wall-clock time of the append (`HH:MM:SS`).
    pub time: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            from: message.from.clone(),
            to: message.to.as_str().to_string(),
            text: message.text.clone(),
            kind: message.kind.as_str().to_string(),
            time: message.time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{MessageKind, Recipient};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_participant_response_serialization() {
        let seen = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let participant = Participant::new("alice", seen);

        let json = serde_json::to_value(ParticipantResponse::from(&participant)).unwrap();
        assert_eq!(json["name"], "alice");
        assert_eq!(json["lastSeen"], seen.timestamp_millis());
    }

    #[test]
    fn test_message_response_serialization() {
        let message = Message {
            id: 7,
            from: "alice".to_string(),
            to: Recipient::Participant("bob".to_string()),
            text: "psst".to_string(),
            kind: MessageKind::Direct,
            time: "10:30:00".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        };

        let json = serde_json::to_value(MessageResponse::from(&message)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "alice",
                "to": "bob",
                "text": "psst",
                "type": "private-message",
                "time": "10:30:00",
            })
        );
    }
}
