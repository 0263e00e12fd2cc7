//! Notifications for clients that poll.
//!
//! Clients don't hold connections open; they poll for the next message.
//! Each game has one message queue, and each player has a chat queue.
//! Queues are bounded and overwrite their oldest entry when full, so
//! delivery is at-most-once and best effort: a slow poller can miss
//! notifications, but a producer never blocks or fails.

mod queue;

pub use queue::BoundedQueue;

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// A game announcement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: String,
}

/// A chat line from one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: PlayerId,
    /// Display name of the sender when the message was posted.
    pub who: String,
    pub text: String,
}

/// Anything that can sit in a notification queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Text(TextMessage),
    Chat(ChatMessage),
}

impl Notification {
    pub fn text(text: impl Into<String>) -> Self {
        Notification::Text(TextMessage { text: text.into() })
    }

    pub fn chat(from: PlayerId, who: impl Into<String>, text: impl Into<String>) -> Self {
        Notification::Chat(ChatMessage {
            from,
            who: who.into(),
            text: text.into(),
        })
    }

    /// The message body, whatever the kind.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Notification::Text(m) => &m.text,
            Notification::Chat(m) => &m.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_json_is_tagged() {
        let n = Notification::chat(PlayerId::new("A"), "Allen", "hi");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["kind"], "chat");
        assert_eq!(json["who"], "Allen");
        assert_eq!(json["text"], "hi");

        let t = serde_json::to_value(Notification::text("Created game")).unwrap();
        assert_eq!(t, serde_json::json!({"kind": "text", "text": "Created game"}));
    }

    #[test]
    fn test_body() {
        assert_eq!(Notification::text("x").body(), "x");
        assert_eq!(Notification::chat(PlayerId::new("B"), "Bob", "y").body(), "y");
    }
}
