//! Local image preview references.
//!
//! When a send includes an image, the composer needs something to display
//! before the backend confirms a URL. The registry allocates an ephemeral
//! `preview://` reference backed by the attachment bytes; references stay
//! valid until explicitly released, and the count of outstanding references
//! is observable so leaks are visible.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use tutor_core::session::ImageAttachment;

/// Scheme prefix for locally allocated preview references.
pub const PREVIEW_SCHEME: &str = "preview://";

/// Registry of live preview references and their backing bytes.
///
/// References are valid only for the lifetime of the client session. The
/// store releases a reference when a send rolls back or when a
/// server-confirmed URL supersedes it; callers release references for
/// attachments they discard before sending.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl PreviewRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a preview reference for the attachment and retains its bytes.
    pub async fn register(&self, attachment: &ImageAttachment) -> String {
        let reference = format!("{}{}", PREVIEW_SCHEME, Uuid::new_v4());
        let mut entries = self.entries.write().await;
        entries.insert(reference.clone(), attachment.data.clone());
        reference
    }

    /// Returns the bytes behind a live reference, if it has not been released.
    pub async fn resolve(&self, reference: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().await;
        entries.get(reference).cloned()
    }

    /// Releases a reference. Releasing an unknown reference is a no-op.
    pub async fn release(&self, reference: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(reference);
    }

    /// Number of outstanding references.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Whether no references are outstanding.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Releases every outstanding reference.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_attachment() -> ImageAttachment {
        ImageAttachment::new("photo.png", "image/png", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = PreviewRegistry::new();
        let reference = registry.register(&sample_attachment()).await;
        assert!(reference.starts_with(PREVIEW_SCHEME));
        assert_eq!(registry.resolve(&reference).await, Some(vec![1, 2, 3]));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_release_drops_the_bytes() {
        let registry = PreviewRegistry::new();
        let reference = registry.register(&sample_attachment()).await;
        registry.release(&reference).await;
        assert_eq!(registry.resolve(&reference).await, None);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_release_unknown_reference_is_noop() {
        let registry = PreviewRegistry::new();
        registry.release("preview://never-issued").await;
        assert!(registry.is_empty().await);
    }
}
