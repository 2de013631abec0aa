//! Image payloads for try-on requests.

use std::path::Path;

use base64::prelude::*;

use crate::{Error, Result};

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// A validated image, ready to be embedded in a request as a data URL.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    media_type: String,
    data: Vec<u8>,
}

impl ImageInput {
    pub fn from_bytes(data: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Result<Self> {
        let data = data.into();
        let media_type = media_type.into();

        if !media_type.starts_with("image/") {
            return Err(Error::invalid_request(format!(
                "unsupported file type {media_type}, expected an image"
            )));
        }
        if data.is_empty() {
            return Err(Error::invalid_request("image is empty"));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(Error::invalid_request(format!(
                "image is {} bytes, limit is {} bytes",
                data.len(),
                MAX_IMAGE_BYTES
            )));
        }

        Ok(Self { media_type, data })
    }

    /// Reads `path`, guessing the media type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        // check the size before pulling the whole file into memory
        let len = tokio::fs::metadata(path).await?.len();
        if len > MAX_IMAGE_BYTES as u64 {
            return Err(Error::invalid_request(format!(
                "{} is {} bytes, limit is {} bytes",
                path.display(),
                len,
                MAX_IMAGE_BYTES
            )));
        }

        let data = tokio::fs::read(path).await?;
        Self::from_bytes(data, media_type)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.data)
    }

    /// `data:<media type>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageInput")
            .field("media_type", &self.media_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_data_url() {
        let image = ImageInput::from_bytes(PNG_HEADER.to_vec(), "image/png").unwrap();
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(image.len(), 8);
    }

    #[test]
    fn test_rejects_non_image() {
        let err = ImageInput::from_bytes(b"%PDF-1.7".to_vec(), "application/pdf").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_size_limit() {
        assert!(ImageInput::from_bytes(vec![0u8; MAX_IMAGE_BYTES], "image/jpeg").is_ok());
        assert!(ImageInput::from_bytes(vec![0u8; MAX_IMAGE_BYTES + 1], "image/jpeg").is_err());
        assert!(ImageInput::from_bytes(Vec::new(), "image/jpeg").is_err());
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shirt.png");
        tokio::fs::write(&path, PNG_HEADER).await.unwrap();

        let image = ImageInput::from_path(&path).await.unwrap();
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.to_base64(), "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        assert!(ImageInput::from_path(&path).await.is_err());
        assert!(ImageInput::from_path(dir.path().join("missing.png")).await.is_err());
    }
}
