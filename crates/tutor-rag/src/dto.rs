//! Wire payloads for the RAG backend.
//!
//! Field names follow the backend contract; conversions into the domain
//! types live here so the rest of the client never sees wire shapes.

use serde::Deserialize;
use uuid::Uuid;

use tutor_core::session::{
    AssistantTurn, MessagePair, MessageReply, Session, SessionDetail, SessionSummary, UserTurn,
};

/// Session descriptor as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionPayload {
    pub session_id: String,
    pub student_id: String,
    #[serde(default)]
    pub session_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub message_count: u64,
}

impl From<SessionPayload> for Session {
    fn from(payload: SessionPayload) -> Self {
        let title = payload.session_name.unwrap_or_else(|| {
            let prefix = &payload.session_id[..payload.session_id.len().min(8)];
            format!("Session {prefix}")
        });
        Session {
            id: payload.session_id,
            student_id: payload.student_id,
            title,
            created_at: payload.created_at,
            updated_at: payload.updated_at,
            message_count: payload.message_count,
        }
    }
}

/// Response to a create-session call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionResponse {
    pub session: SessionPayload,
}

/// Response to a RAG query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    /// Echoed user text; may embed a markdown image token.
    pub user_input: String,
    /// The assistant's reply.
    pub response: String,
}

impl From<QueryResponse> for MessageReply {
    fn from(payload: QueryResponse) -> Self {
        MessageReply {
            user_input: payload.user_input,
            response: payload.response,
        }
    }
}

/// One entry in the session history listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionItemPayload {
    pub session_id: String,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    pub updated_at: String,
    #[serde(default)]
    pub message_count: u64,
}

impl From<SessionItemPayload> for SessionSummary {
    fn from(payload: SessionItemPayload) -> Self {
        let title = payload.session_name.unwrap_or_else(|| {
            let prefix = &payload.session_id[..payload.session_id.len().min(8)];
            format!("Session {prefix}")
        });
        SessionSummary {
            id: payload.session_id,
            title,
            last_message: payload.last_message,
            updated_at: payload.updated_at,
            message_count: payload.message_count,
        }
    }
}

/// Response to a history listing call. The backend omits `sessions` when the
/// student has none; that is ordinary empty state.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionHistoryResponse {
    #[serde(default)]
    pub sessions: Vec<SessionItemPayload>,
}

/// One side of a historical message pair.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnPayload {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

/// One historical message pair as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct PairPayload {
    pub user: TurnPayload,
    pub chatbot: TurnPayload,
}

impl From<PairPayload> for MessagePair {
    fn from(payload: PairPayload) -> Self {
        MessagePair {
            exchange_id: Uuid::new_v4().to_string(),
            user: UserTurn {
                content: payload.user.content,
                timestamp: payload.user.timestamp,
                image: None,
            },
            chatbot: AssistantTurn {
                content: payload.chatbot.content,
                timestamp: payload.chatbot.timestamp,
            },
        }
    }
}

/// Response to a session detail call.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetailResponse {
    pub session: SessionPayload,
    #[serde(default)]
    pub conversation: Vec<PairPayload>,
}

impl From<SessionDetailResponse> for SessionDetail {
    fn from(payload: SessionDetailResponse) -> Self {
        SessionDetail {
            session: payload.session.into(),
            conversation: payload.conversation.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_response() {
        let json = r#"{
            "session": {
                "session_id": "c2f1a7e0-aaaa-bbbb-cccc-000000000001",
                "student_id": "student-42",
                "session_name": "Photosynthesis help",
                "created_at": "2025-01-10T09:00:00Z",
                "updated_at": "2025-01-10T09:00:00Z",
                "message_count": 0
            }
        }"#;
        let parsed: CreateSessionResponse = serde_json::from_str(json).unwrap();
        let session: Session = parsed.session.into();
        assert_eq!(session.id, "c2f1a7e0-aaaa-bbbb-cccc-000000000001");
        assert_eq!(session.title, "Photosynthesis help");
        assert_eq!(session.message_count, 0);
    }

    #[test]
    fn test_missing_session_name_falls_back_to_id_prefix() {
        let json = r#"{
            "session_id": "c2f1a7e0-dddd-eeee-ffff-000000000002",
            "student_id": "student-42",
            "created_at": "2025-01-10T09:00:00Z",
            "updated_at": "2025-01-10T09:00:00Z"
        }"#;
        let payload: SessionPayload = serde_json::from_str(json).unwrap();
        let session: Session = payload.into();
        assert_eq!(session.title, "Session c2f1a7e0");
        assert_eq!(session.message_count, 0);
    }

    #[test]
    fn test_history_response_defaults_to_empty() {
        let parsed: SessionHistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.sessions.is_empty());
    }

    #[test]
    fn test_query_response_into_reply() {
        let json = r#"{"user_input": "hi ![img](http://a/b.png)", "response": "hello!"}"#;
        let parsed: QueryResponse = serde_json::from_str(json).unwrap();
        let reply: MessageReply = parsed.into();
        assert_eq!(reply.user_input, "hi ![img](http://a/b.png)");
        assert_eq!(reply.response, "hello!");
    }

    #[test]
    fn test_detail_response_keeps_pair_order() {
        let json = r#"{
            "session": {
                "session_id": "s-1",
                "student_id": "student-42",
                "created_at": "2025-01-10T09:00:00Z",
                "updated_at": "2025-01-10T09:05:00Z",
                "message_count": 2
            },
            "conversation": [
                {
                    "user": {"content": "first", "timestamp": "2025-01-10T09:01:00Z"},
                    "chatbot": {"content": "first reply", "timestamp": "2025-01-10T09:01:05Z"}
                },
                {
                    "user": {"content": "second", "timestamp": "2025-01-10T09:02:00Z"},
                    "chatbot": {"content": "second reply", "timestamp": "2025-01-10T09:02:07Z"}
                }
            ]
        }"#;
        let parsed: SessionDetailResponse = serde_json::from_str(json).unwrap();
        let detail: SessionDetail = parsed.into();
        assert_eq!(detail.conversation.len(), 2);
        assert_eq!(detail.conversation[0].user.content, "first");
        assert_eq!(detail.conversation[1].chatbot.content, "second reply");
        assert!(detail.conversation.iter().all(|pair| pair.is_settled()));
        assert_ne!(
            detail.conversation[0].exchange_id,
            detail.conversation[1].exchange_id
        );
    }
}
