use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};

use crate::domain::error::DomainError;

/// Decoded image upload, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Lower-case file extension taken from the MIME subtype (`png`, `jpeg`, ...).
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// What an image belongs to. Each kind lives in its own media folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Recipe,
    Avatar,
}

impl ImageKind {
    pub fn folder(self) -> &'static str {
        match self {
            ImageKind::Recipe => "recipes",
            ImageKind::Avatar => "users",
        }
    }
}

impl ImageUpload {
    /// Parse a `data:image/<ext>;base64,<payload>` string.
    pub fn from_data_uri(raw: &str) -> Result<Self, DomainError> {
        Self::from_data_uri_field("image", raw)
    }

    /// Same as [`ImageUpload::from_data_uri`], reporting failures against `field`.
    pub fn from_data_uri_field(field: &str, raw: &str) -> Result<Self, DomainError> {
        let invalid = |msg: &str| DomainError::validation(field, msg);

        let rest = raw
            .trim()
            .strip_prefix("data:image/")
            .ok_or_else(|| invalid("Expected a data:image/<type>;base64 payload"))?;
        let (extension, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| invalid("Expected a data:image/<type>;base64 payload"))?;

        let extension = extension.to_ascii_lowercase();
        if extension.is_empty()
            || extension.len() > 10
            || !extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(invalid("Unsupported image type"));
        }

        let bytes = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|_| invalid("Image payload is not valid base64"))?;
        if bytes.is_empty() {
            return Err(invalid("Image payload is empty"));
        }

        Ok(Self { extension, bytes })
    }
}

/// Image-storage collaborator: persists an upload and returns its public reference.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, kind: ImageKind, upload: ImageUpload) -> Result<String, DomainError>;

    /// Drops a previously saved image. Unknown references are ignored.
    async fn remove(&self, reference: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_png_data_uri() {
        let upload = ImageUpload::from_data_uri("data:image/PNG;base64,aGVsbG8=").unwrap();
        assert_eq!(upload.extension, "png");
        assert_eq!(upload.bytes, b"hello");
    }

    #[test]
    fn errors_name_the_requested_field() {
        let err = ImageUpload::from_data_uri_field("avatar", "nope").unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "avatar"));
        assert_eq!(ImageKind::Avatar.folder(), "users");
        assert_eq!(ImageKind::Recipe.folder(), "recipes");
    }

    #[test]
    fn rejects_malformed_payloads() {
        for raw in [
            "",
            "hello",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png,aGVsbG8=",
            "data:image/;base64,aGVsbG8=",
            "data:image/p.n/g;base64,aGVsbG8=",
            "data:image/png;base64,***",
            "data:image/png;base64,",
        ] {
            let err = ImageUpload::from_data_uri(raw).unwrap_err();
            assert!(
                matches!(err, DomainError::Validation { ref field, .. } if field == "image"),
                "{raw:?}"
            );
        }
    }
}
