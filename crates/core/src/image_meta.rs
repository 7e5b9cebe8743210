//! Upload intake checks: accepted file types and header-only dimension
//! extraction. Pixel data is never decoded.

use std::io::Cursor;

use image::ImageReader;

use crate::analyzer::ImageSize;
use crate::error::CoreError;

/// Accepted upload extensions (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Default upload limit: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// `true` if `filename` has one of [`ALLOWED_EXTENSIONS`] (case-insensitive).
pub fn is_allowed_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// `true` if a declared MIME type describes an image.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// Validate an upload's name and optional declared content type.
pub fn validate_upload(filename: &str, content_type: Option<&str>) -> Result<(), CoreError> {
    if !is_allowed_filename(filename) {
        return Err(CoreError::Validation(format!(
            "Unsupported file extension for '{filename}'. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    if let Some(ct) = content_type {
        if !is_image_content_type(ct) {
            return Err(CoreError::Validation(format!(
                "Unsupported content type '{ct}'"
            )));
        }
    }
    Ok(())
}

/// Read pixel dimensions from the image header.
pub fn read_dimensions(bytes: &[u8]) -> Result<ImageSize, CoreError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CoreError::ImageLoad(e.to_string()))?;

    if reader.format().is_none() {
        return Err(CoreError::ImageLoad("unrecognized image format".into()));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::ImageLoad(e.to_string()))?;

    let size = ImageSize::new(width, height);
    size.validate()?;
    Ok(size)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
