use anyhow::Context;
use fitsmart_core::types::RoutineInput;
use fitsmart_core::upload::{MAX_UPLOAD_BYTES, Upload};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Extension table for files picked from disk, where no MIME type is declared.
const MIME_BY_EXTENSION: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
];

pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    MIME_BY_EXTENSION
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Reads a file into an `Upload`.
///
/// At most one byte past the upload limit is read, which is enough for
/// acquisition to reject the file without loading all of it.
pub fn load_upload(path: &Path, mime_override: Option<&str>) -> anyhow::Result<Upload> {
    let file = fs::File::open(path).with_context(|| format!("failed to open: {}", path.display()))?;
    let mut bytes = Vec::new();
    file.take(MAX_UPLOAD_BYTES as u64 + 1)
        .read_to_end(&mut bytes)
        .with_context(|| format!("failed reading: {}", path.display()))?;

    let mime = mime_override
        .map(str::to_string)
        .or_else(|| guess_mime(path).map(str::to_string))
        .unwrap_or_default();
    log::debug!(
        "loaded {} ({} bytes, mime {:?})",
        path.display(),
        bytes.len(),
        mime
    );

    Ok(Upload::new(bytes, mime))
}

/// Reads a plain-text routine (e.g. a pasted plan saved to disk).
pub fn load_text_routine(path: &Path) -> anyhow::Result<RoutineInput> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read text routine: {}", path.display()))?;
    Ok(RoutineInput::text(text))
}
