//! Application layer for the Tutor chat client.
//!
//! This crate provides the chat store: the single owner of all mutable chat
//! state (current session, session list, conversation transcript) and the
//! actions a UI layer invokes against it. It coordinates the domain layer
//! (`tutor-core`) and the RAG gateway (`tutor-rag`).

pub mod preview;
pub mod store;

pub use preview::PreviewRegistry;
pub use store::{ChatState, ChatStore};
