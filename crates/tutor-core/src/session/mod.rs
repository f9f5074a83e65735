//! Session domain module.
//!
//! This module contains all chat-session domain models, the gateway interface
//! to the RAG backend, and the echoed-input parser.
//!
//! # Module Structure
//!
//! - `model`: Core session descriptor (`Session`)
//! - `message`: Conversation turn and pair types (`UserTurn`, `AssistantTurn`, `MessagePair`)
//! - `summary`: Read-only projections (`SessionSummary`, `SessionDetail`)
//! - `attachment`: Outgoing image attachments and their client-side validation
//! - `input`: Parsing of markdown-embedded image references in echoed user text
//! - `gateway`: Gateway trait for the RAG backend
//! - `event`: Store events published to observers

mod attachment;
mod event;
mod gateway;
mod input;
mod message;
mod model;
mod summary;

// Re-export public API
pub use attachment::{AttachmentKind, ImageAttachment, MAX_IMAGE_BYTES};
pub use event::ChatEvent;
pub use gateway::{ChatGateway, MessageReply};
pub use input::{ParsedInput, parse_user_input};
pub use message::{AssistantTurn, ImageRef, MessagePair, UserTurn};
pub use model::Session;
pub use summary::{SessionDetail, SessionSummary};
