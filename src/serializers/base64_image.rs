//! Base64 encoded image uploads
//!
//! Accepts either a data URL (`data:image/png;base64,iVBOR...`) or a bare
//! base64 payload. The file type is sniffed from the decoded bytes, never
//! taken from the data URL prefix.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::core::error::FieldError;

const DATA_URL_MARKER: &str = ";base64,";

/// A decoded upload, named `<uuid>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub name: String,
    pub extension: String,
    pub content: Vec<u8>,
}

/// Decoder for base64 image fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64ImageField {
    allowed_extensions: BTreeSet<String>,
}

impl Default for Base64ImageField {
    fn default() -> Self {
        Self::new(["png", "jpg", "jpeg"])
    }
}

impl Base64ImageField {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_extensions: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }

    /// Decode `data` and check its type against the allowed extensions
    pub fn decode(&self, data: &str) -> Result<DecodedFile, FieldError> {
        let payload = match data.split_once(DATA_URL_MARKER) {
            Some((_, payload)) => payload,
            None => data,
        };
        let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

        let content = STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| FieldError::InvalidFile {
                message: e.to_string(),
            })?;

        let extension = match detect_image_type(&content) {
            Some(ext) if self.allowed_extensions.contains(ext) => ext,
            detected => {
                tracing::debug!(?detected, "rejected base64 upload");
                return Err(FieldError::InvalidFileType {
                    detected: detected.map(String::from),
                });
            }
        };

        Ok(DecodedFile {
            name: format!("{}.{}", Uuid::new_v4(), extension),
            extension: extension.to_string(),
            content,
        })
    }
}

/// Sniff an image type from its leading bytes
///
/// JPEG is reported as `jpeg`.
pub fn detect_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.starts_with(b"MM\x00\x2a") || bytes.starts_with(b"II\x2a\x00") {
        Some("tiff")
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        Some("webp")
    } else if bytes.starts_with(b"BM") {
        Some("bmp")
    } else {
        None
    }
}
