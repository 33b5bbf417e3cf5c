use crate::types::{MediaKind, RoutineInput};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Upload ceiling shared by images, PDFs and videos.
pub const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("file is {size} bytes; the limit is {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
    #[error("file is empty")]
    Empty,
}

impl AcquireError {
    pub fn user_message(&self) -> String {
        match self {
            AcquireError::InputTooLarge { limit, .. } => {
                format!("Mi límite es de {} MB.", limit / (1024 * 1024))
            }
            AcquireError::Empty => "El archivo está vacío.".into(),
        }
    }
}

/// A file picked by the user, before it becomes a `RoutineInput`.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub declared_mime: String,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("bytes_len", &self.bytes.len())
            .field("declared_mime", &self.declared_mime)
            .finish()
    }
}

impl Upload {
    pub fn new(bytes: Vec<u8>, declared_mime: impl Into<String>) -> Self {
        Self {
            bytes,
            declared_mime: declared_mime.into(),
        }
    }
}

/// Uploads only ever classify as pdf, video or image; image is the fallback.
pub fn classify_mime(mime: &str) -> MediaKind {
    let mime = mime.to_ascii_lowercase();
    if mime.contains("pdf") {
        MediaKind::Pdf
    } else if mime.contains("video") {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

pub fn acquire(upload: &Upload) -> Result<RoutineInput, AcquireError> {
    acquire_with_limit(upload, MAX_UPLOAD_BYTES)
}

pub fn acquire_with_limit(upload: &Upload, limit: usize) -> Result<RoutineInput, AcquireError> {
    let size = upload.bytes.len();
    // Checked before encoding so oversized files never get copied.
    if size > limit {
        return Err(AcquireError::InputTooLarge { size, limit });
    }
    if size == 0 {
        return Err(AcquireError::Empty);
    }

    let mime = upload.declared_mime.trim();
    let kind = classify_mime(mime);
    let mime_type = (!mime.is_empty()).then(|| mime.to_string());

    Ok(RoutineInput::new(kind, STANDARD.encode(&upload.bytes), mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_declared_mime() {
        assert_eq!(classify_mime("application/pdf"), MediaKind::Pdf);
        assert_eq!(classify_mime("video/mp4"), MediaKind::Video);
        assert_eq!(classify_mime("VIDEO/QuickTime"), MediaKind::Video);
        assert_eq!(classify_mime("image/png"), MediaKind::Image);
        assert_eq!(classify_mime(""), MediaKind::Image);
    }

    #[test]
    fn encodes_as_base64_and_keeps_mime() {
        let input = acquire(&Upload::new(b"hello".to_vec(), "image/jpeg")).unwrap();
        assert_eq!(input.kind, MediaKind::Image);
        assert_eq!(input.content, "aGVsbG8=");
        assert_eq!(input.mime_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn missing_mime_is_not_recorded() {
        let input = acquire(&Upload::new(vec![1, 2, 3], " ")).unwrap();
        assert_eq!(input.mime_type, None);
    }

    #[test]
    fn rejects_oversized_files() {
        let upload = Upload::new(vec![0; 11], "video/mp4");
        assert_eq!(
            acquire_with_limit(&upload, 10),
            Err(AcquireError::InputTooLarge { size: 11, limit: 10 })
        );
    }

    #[test]
    fn accepts_file_exactly_at_limit() {
        let upload = Upload::new(vec![0; 10], "video/mp4");
        assert!(acquire_with_limit(&upload, 10).is_ok());
    }

    #[test]
    fn rejects_empty_files() {
        assert_eq!(
            acquire(&Upload::new(vec![], "image/png")),
            Err(AcquireError::Empty)
        );
    }

    #[test]
    fn too_large_message_mentions_limit_in_mb() {
        let err = AcquireError::InputTooLarge {
            size: MAX_UPLOAD_BYTES + 1,
            limit: MAX_UPLOAD_BYTES,
        };
        assert!(err.user_message().contains("15 MB"));
    }
}
