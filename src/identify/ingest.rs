use crate::{Error, Result, llm::ImagePart};
use axum::body::Bytes;
use tracing::info;

pub const MAX_IMAGES: usize = 5;
pub const MAX_TOTAL_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        }
    }
}

/// Images that passed validation, ready for the gateway.
#[derive(Debug, Clone)]
pub struct ValidatedImages {
    pub parts: Vec<ImagePart>,
    pub total_bytes: usize,
}

/// Enforces the image count, the combined size ceiling and the `image/` type prefix.
pub fn validate_images(images: &[ImageUpload]) -> Result<ValidatedImages> {
    if images.is_empty() {
        return Err(Error::validation("At least one image is required"));
    }
    if images.len() > MAX_IMAGES {
        return Err(Error::validation(format!(
            "Maximum {} images allowed",
            MAX_IMAGES
        )));
    }

    let mut parts = Vec::with_capacity(images.len());
    let mut total_bytes = 0usize;

    for (index, image) in images.iter().enumerate() {
        total_bytes += image.bytes.len();
        if total_bytes > MAX_TOTAL_IMAGE_BYTES {
            return Err(Error::payload_too_large("Images too large (max 20MB total)"));
        }

        if let Some(content_type) = image.content_type.as_deref() {
            if !content_type.starts_with("image/") {
                return Err(Error::validation(format!(
                    "Invalid file type: {}",
                    content_type
                )));
            }
        }

        parts.push(ImagePart::new(
            image.bytes.clone(),
            image.content_type.as_deref(),
        ));
        info!("Processed image {}: {} bytes", index + 1, image.bytes.len());
    }

    Ok(ValidatedImages { parts, total_bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn image(size: usize, content_type: Option<&str>) -> ImageUpload {
        ImageUpload::new(vec![0u8; size], content_type)
    }

    #[test]
    fn test_rejects_empty_upload() {
        let err = validate_images(&[]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "At least one image is required");
    }

    #[test]
    fn test_rejects_more_than_five() {
        let images: Vec<_> = (0..6).map(|_| image(10, Some("image/png"))).collect();
        let err = validate_images(&images).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 5 images allowed");
    }

    #[test]
    fn test_rejects_combined_size_over_limit() {
        let images = vec![
            image(MAX_TOTAL_IMAGE_BYTES / 2, Some("image/png")),
            image(MAX_TOTAL_IMAGE_BYTES / 2 + 1, Some("image/png")),
        ];
        let err = validate_images(&images).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge(_)));
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let images = vec![image(MAX_TOTAL_IMAGE_BYTES, None)];
        let validated = validate_images(&images).unwrap();
        assert_eq!(validated.total_bytes, MAX_TOTAL_IMAGE_BYTES);
    }

    #[test]
    fn test_rejects_non_image_content_type() {
        let images = vec![image(10, Some("image/png")), image(10, Some("text/plain"))];
        let err = validate_images(&images).unwrap_err();
        assert_eq!(err.to_string(), "Invalid file type: text/plain");
    }

    #[test]
    fn test_missing_content_type_defaults_to_jpeg() {
        let validated = validate_images(&[image(3, None), image(3, Some("image/webp"))]).unwrap();
        assert_eq!(validated.parts[0].mime_type, "image/jpeg");
        assert_eq!(validated.parts[1].mime_type, "image/webp");
        assert_eq!(validated.total_bytes, 6);
    }
}
