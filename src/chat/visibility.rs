//! Message visibility rules.

use super::message::{Message, MessageKind};

/// Whether `reader` may see `message`.
///
/// Broadcast and status messages are public. A direct message is visible to
/// its sender and its recipient only; an anonymous reader (`None` or empty)
/// never sees one.
pub fn is_visible(message: &Message, reader: Option<&str>) -> bool {
    match message.kind {
        MessageKind::Broadcast | MessageKind::Status => true,
        MessageKind::Direct => match reader.filter(|r| !r.is_empty()) {
            Some(reader) => message.from == reader || message.to.includes(reader),
            None => false,
        },
    }
}
