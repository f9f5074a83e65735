use serde::{Deserialize, Serialize};

/// State-change notifications published by the chat store.
///
/// Observers (typically a UI layer) subscribe to these instead of polling
/// store snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A new session became the current one.
    SessionCreated { session_id: String },
    /// An optimistic pair was appended to the conversation.
    PairAppended {
        session_id: String,
        exchange_id: String,
    },
    /// An in-flight pair was reconciled with the server's reply.
    PairSettled {
        session_id: String,
        exchange_id: String,
    },
    /// An in-flight pair was removed because its send failed.
    PairRolledBack {
        session_id: String,
        exchange_id: String,
    },
    /// The session summary list was replaced wholesale.
    HistoryRefreshed { count: usize },
    /// The conversation transcript was replaced wholesale.
    ConversationReplaced { session_id: String, pairs: usize },
    /// A session was deleted server-side.
    SessionDeleted { session_id: String },
}
