//! Conversation turn and pair types.
//!
//! A conversation is an ordered sequence of message pairs, insertion order =
//! chronological order. Each pair is one user turn plus the assistant turn
//! that answers it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a user turn's image is served from.
///
/// A turn starts out with a local preview reference (valid only for the
/// lifetime of the client session) and is upgraded to a server-confirmed URL
/// during reconciliation when the backend echoes one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reference", rename_all = "snake_case")]
pub enum ImageRef {
    /// Local ephemeral preview reference (`preview://…`). Must be released
    /// through the preview registry when no longer displayed.
    Preview(String),
    /// Server-confirmed URL.
    Url(String),
}

impl ImageRef {
    /// Returns the underlying reference string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preview(reference) | Self::Url(reference) => reference,
        }
    }

    /// Whether this reference is a local preview rather than a server URL.
    pub fn is_preview(&self) -> bool {
        matches!(self, Self::Preview(_))
    }
}

/// The user half of a message pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTurn {
    /// Text content. May be empty when only an image was sent.
    pub content: String,
    /// Timestamp when the turn was created (ISO 8601 format).
    pub timestamp: String,
    /// Attached image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// The assistant half of a message pair.
///
/// Empty content is the placeholder state meaning "awaiting response"; a turn
/// with non-empty content is settled and immutable apart from the one-time
/// optimistic-to-confirmed reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantTurn {
    /// Reply text, or the empty string while the exchange is in flight.
    pub content: String,
    /// Timestamp when the turn was created or settled (ISO 8601 format).
    pub timestamp: String,
}

/// One user turn plus its corresponding assistant turn.
///
/// `exchange_id` is generated locally when the pair is appended and never
/// leaves the client. Reconciliation and rollback look the pair up by this id
/// rather than by position, so two in-flight sends to the same session cannot
/// settle each other's placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePair {
    /// Locally generated identifier for this exchange (UUID format).
    pub exchange_id: String,
    /// The user turn.
    pub user: UserTurn,
    /// The assistant turn.
    pub chatbot: AssistantTurn,
}

impl MessagePair {
    /// Creates an in-flight pair: the user turn as submitted and an empty
    /// assistant placeholder, both stamped with the current time.
    pub fn pending(content: impl Into<String>, image: Option<ImageRef>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            exchange_id: Uuid::new_v4().to_string(),
            user: UserTurn {
                content: content.into(),
                timestamp: now.clone(),
                image,
            },
            chatbot: AssistantTurn {
                content: String::new(),
                timestamp: now,
            },
        }
    }

    /// Creates an already-settled pair, e.g. when loading a historical
    /// transcript from the backend.
    pub fn settled_at(
        user_content: impl Into<String>,
        user_timestamp: impl Into<String>,
        reply: impl Into<String>,
        reply_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            exchange_id: Uuid::new_v4().to_string(),
            user: UserTurn {
                content: user_content.into(),
                timestamp: user_timestamp.into(),
                image: None,
            },
            chatbot: AssistantTurn {
                content: reply.into(),
                timestamp: reply_timestamp.into(),
            },
        }
    }

    /// Replaces the optimistic contents with the server's canonical version
    /// of the exchange, stamping both turns with fresh timestamps.
    pub fn settle(
        &mut self,
        user_content: impl Into<String>,
        image: Option<ImageRef>,
        reply: impl Into<String>,
    ) {
        let now = chrono::Utc::now().to_rfc3339();
        self.user.content = user_content.into();
        self.user.timestamp = now.clone();
        self.user.image = image;
        self.chatbot = AssistantTurn {
            content: reply.into(),
            timestamp: now,
        };
    }

    /// Whether this exchange has completed. An empty assistant content means
    /// the reply is still in flight.
    pub fn is_settled(&self) -> bool {
        !self.chatbot.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_pair_is_in_flight() {
        let pair = MessagePair::pending("hello", None);
        assert!(!pair.is_settled());
        assert_eq!(pair.user.content, "hello");
        assert_eq!(pair.chatbot.content, "");
        assert!(pair.user.image.is_none());
    }

    #[test]
    fn test_settle_completes_the_pair() {
        let mut pair = MessagePair::pending("hello", None);
        pair.settle("hello", None, "hi there");
        assert!(pair.is_settled());
        assert_eq!(pair.chatbot.content, "hi there");
    }

    #[test]
    fn test_exchange_ids_are_unique() {
        let a = MessagePair::pending("a", None);
        let b = MessagePair::pending("b", None);
        assert_ne!(a.exchange_id, b.exchange_id);
    }

    #[test]
    fn test_image_ref_accessors() {
        let preview = ImageRef::Preview("preview://x".to_string());
        let url = ImageRef::Url("http://a/b.png".to_string());
        assert!(preview.is_preview());
        assert!(!url.is_preview());
        assert_eq!(url.as_str(), "http://a/b.png");
    }
}
