//! Wound image upload rules: accepted formats and storage layout.

/// Accepted file extensions (lowercase, without the dot).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Default upper bound on an uploaded image, in bytes (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// URL prefix under which stored uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Extract and validate the extension of an uploaded file name.
///
/// Returns the lowercase extension, or an error naming the accepted formats.
pub fn image_extension(file_name: &str) -> Result<String, String> {
    let ext = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    };
    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(format!(
            "Unsupported image format '.{ext}'. Supported: {}",
            ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

/// MIME type for an accepted extension.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Path of a stored image relative to the upload root.
pub fn relative_storage_path(wound_id: i64, stored_name: &str) -> String {
    format!("wounds/{wound_id}/{stored_name}")
}

/// Public URL of a stored image.
pub fn public_url(relative_path: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/{relative_path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions_case_insensitively() {
        assert_eq!(image_extension("leg.PNG").unwrap(), "png");
        assert_eq!(image_extension("photo.final.jpeg").unwrap(), "jpeg");
        assert_eq!(image_extension("x.webp").unwrap(), "webp");
    }

    #[test]
    fn rejects_unsupported_or_missing_extensions() {
        assert!(image_extension("scan.tiff").is_err());
        assert!(image_extension("noext").is_err());
        assert!(image_extension(".png").is_err());
        let msg = image_extension("a.gif").unwrap_err();
        assert!(msg.contains(".gif"));
        assert!(msg.contains(".webp"));
    }

    #[test]
    fn storage_layout() {
        let rel = relative_storage_path(12, "abc.png");
        assert_eq!(rel, "wounds/12/abc.png");
        assert_eq!(public_url(&rel), "/uploads/wounds/12/abc.png");
        assert_eq!(content_type_for("jpg"), "image/jpeg");
    }
}
