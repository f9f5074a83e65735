//! Read-only session projections.

use serde::{Deserialize, Serialize};

use super::message::MessagePair;
use super::model::Session;

/// A summary projection of a session used for list display.
///
/// Summaries are owned and refreshed wholesale by a history fetch; they are
/// never patched individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: String,
    /// Session title.
    pub title: String,
    /// Preview of the most recent message, if the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    /// Timestamp of the last update (ISO 8601 format).
    pub updated_at: String,
    /// Number of completed exchanges.
    pub message_count: u64,
}

/// The full transcript of one session as returned by a detail fetch.
///
/// User turns still carry the backend's raw text at this point; the store
/// runs the input parser over each of them before exposing the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetail {
    /// The session descriptor.
    pub session: Session,
    /// Ordered historical message pairs.
    pub conversation: Vec<MessagePair>,
}
