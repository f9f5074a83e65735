//! Session domain model.
//!
//! This module contains the core Session entity that represents
//! one persisted chat conversation between a student and the AI tutor.

use serde::{Deserialize, Serialize};

/// Represents one chat session in the client's domain layer.
///
/// A session is created by an explicit create call, mutated only by the chat
/// store (message count and updated-at advance when an exchange completes),
/// and deleted by an explicit delete call. Deletion is terminal: no further
/// operation may target a deleted session id.
///
/// This is the "pure" domain model that the store operates on, independent of
/// the backend's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (opaque, assigned by the backend)
    pub id: String,
    /// Identifier of the student who owns this session
    pub student_id: String,
    /// Human-readable session title
    pub title: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
    /// Number of completed message exchanges in this session
    pub message_count: u64,
}

impl Session {
    /// Sets `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
