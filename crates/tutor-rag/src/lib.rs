//! REST gateway to the RAG tutoring backend.
//!
//! This crate implements `tutor_core::session::ChatGateway` over HTTP:
//! session creation, message submission (with optional image upload),
//! history and detail retrieval, and deletion.
//!
//! Configuration priority: secret.json > environment variables > defaults.

pub mod client;
pub mod config;
pub mod dto;

pub use client::RagClient;
pub use config::RagConfig;
