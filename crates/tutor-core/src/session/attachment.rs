//! Outgoing message attachments.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};

/// Maximum accepted attachment size in bytes (1 MiB).
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Kind tag for attachments. Only images are supported today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
}

/// An image attached to an outgoing message.
///
/// At most one attachment may accompany a message. The attachment is not a
/// persisted entity: once the send completes it is subsumed into the message
/// pair's user-turn image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// Original file name, forwarded to the backend with the upload.
    pub file_name: String,
    /// MIME type reported by the picker (e.g. `image/png`).
    pub mime_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::Image
    }

    /// Size of the attachment in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Validates the attachment against the client-side constraints: the MIME
    /// type must begin with `image/` and the payload must not exceed
    /// [`MAX_IMAGE_BYTES`]. Runs before any network call; a violation never
    /// reaches the backend.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::Validation` describing the violated constraint.
    pub fn validate(&self) -> Result<()> {
        if !self.mime_type.starts_with("image/") {
            return Err(TutorError::validation(format!(
                "unsupported attachment type '{}': only images can be sent",
                self.mime_type
            )));
        }
        if self.data.len() > MAX_IMAGE_BYTES {
            return Err(TutorError::validation(format!(
                "image is {} bytes; the limit is {} bytes (1 MiB)",
                self.data.len(),
                MAX_IMAGE_BYTES
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_image_passes() {
        let attachment = ImageAttachment::new("photo.png", "image/png", vec![0u8; 512]);
        assert!(attachment.validate().is_ok());
        assert_eq!(attachment.kind(), AttachmentKind::Image);
        assert_eq!(attachment.size(), 512);
    }

    #[test]
    fn test_exactly_one_mib_passes() {
        let attachment = ImageAttachment::new("big.jpg", "image/jpeg", vec![0u8; MAX_IMAGE_BYTES]);
        assert!(attachment.validate().is_ok());
    }

    #[test]
    fn test_oversized_image_rejected() {
        let attachment =
            ImageAttachment::new("huge.jpg", "image/jpeg", vec![0u8; MAX_IMAGE_BYTES + 1]);
        let err = attachment.validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_non_image_mime_rejected() {
        let attachment = ImageAttachment::new("notes.pdf", "application/pdf", vec![0u8; 16]);
        let err = attachment.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("application/pdf"));
    }
}
