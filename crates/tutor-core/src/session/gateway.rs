//! Chat gateway trait.
//!
//! Defines the interface through which the store reaches the RAG backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::attachment::ImageAttachment;
use super::model::Session;
use super::summary::{SessionDetail, SessionSummary};
use crate::error::Result;

/// The backend's canonical record of one completed exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReply {
    /// Echoed user text. May embed one markdown image token when an image
    /// accompanied the message.
    pub user_input: String,
    /// The assistant's reply text.
    pub response: String,
}

/// An abstract gateway to the RAG tutoring backend.
///
/// This trait is the store's only view of the backend, decoupling the chat
/// state machine from the wire protocol. Implementations are expected to
/// normalize transport and backend failures into `TutorError` variants; an
/// empty result list is ordinary state, not an error.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Creates a new chat session for a student.
    ///
    /// # Arguments
    ///
    /// * `student_id` - The id of the student who will own the session
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: The newly created session descriptor
    /// - `Err(_)`: The backend rejected the request or was unreachable
    async fn create_session(&self, student_id: &str) -> Result<Session>;

    /// Submits a message (and optional image) to a session and waits for the
    /// assistant's reply.
    ///
    /// # Arguments
    ///
    /// * `session_id` - The session the message belongs to
    /// * `user_input` - The user's text (may be empty when only an image is sent)
    /// * `student_id` - The id of the student sending the message
    /// * `image` - Optional validated image attachment
    ///
    /// # Returns
    ///
    /// - `Ok(MessageReply)`: Echoed user text plus the assistant's reply
    /// - `Err(_)`: The exchange did not complete; nothing should be kept
    async fn send_message(
        &self,
        session_id: &str,
        user_input: &str,
        student_id: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<MessageReply>;

    /// Lists all sessions belonging to a student.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<SessionSummary>)`: Possibly empty list of summaries
    /// - `Err(_)`: Error occurred during retrieval
    async fn session_history(&self, student_id: &str) -> Result<Vec<SessionSummary>>;

    /// Fetches the full transcript of one session.
    ///
    /// User turns in the returned conversation still carry raw
    /// markdown-embedded image references; callers run the input parser
    /// before display.
    ///
    /// # Returns
    ///
    /// - `Ok(SessionDetail)`: Descriptor plus ordered historical pairs
    /// - `Err(_)`: Error occurred during retrieval
    async fn session_detail(&self, session_id: &str, student_id: &str) -> Result<SessionDetail>;

    /// Deletes a session server-side.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Session deleted
    /// - `Err(_)`: Error occurred during deletion
    async fn delete_session(&self, session_id: &str, student_id: &str) -> Result<()>;
}
