//! Image file conventions and dimension probing.

use std::path::Path;

/// Extensions accepted for site images (lowercase only).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Extensions without an intrinsic pixel size; dimension checks skip them.
const VECTOR_EXTENSIONS: &[&str] = &["svg"];

/// Lowercased extension of a path, if any.
fn extension(path: &str) -> Option<String> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Whether a site-relative path names a raster image whose size can be probed.
#[must_use]
pub fn is_raster(path: &str) -> bool {
    extension(path).is_some_and(|ext| {
        ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str())
            && !VECTOR_EXTENSIONS.contains(&ext.as_str())
    })
}

/// Check an image filename against the naming conventions: lowercase, no
/// whitespace, allowed extension.
///
/// # Errors
///
/// Returns a human-readable description of the first violated convention.
pub fn check_image_file_name(file_name: &str) -> Result<(), String> {
    if file_name.chars().any(char::is_whitespace) {
        return Err("Image filename must not contain whitespace".to_owned());
    }
    if file_name != file_name.to_lowercase() {
        return Err("Image filename must be lowercase".to_owned());
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ALLOWED_IMAGE_EXTENSIONS.contains(&ext) => Ok(()),
        _ => Err(format!(
            "Image extension must be one of: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )),
    }
}

/// Read the pixel dimensions of an image from its header.
///
/// # Errors
///
/// Returns a description of why the image could not be probed (unknown
/// format, truncated header, I/O failure).
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), String> {
    image::image_dimensions(path).map_err(|e| format!("Cannot read image size: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_raster() {
        assert!(is_raster("assets/img/a.png"));
        assert!(is_raster("assets/img/a.JPG"));
        assert!(!is_raster("assets/img/a.svg"));
        assert!(!is_raster("assets/img/a"));
        assert!(!is_raster("assets/img.d/a"));
    }

    #[test]
    fn test_check_image_file_name() {
        assert!(check_image_file_name("pi-day.png").is_ok());
        assert!(check_image_file_name("diagram_v2.webp").is_ok());
        assert!(
            check_image_file_name("Pi-Day.png")
                .unwrap_err()
                .contains("lowercase")
        );
        assert!(
            check_image_file_name("pi day.png")
                .unwrap_err()
                .contains("whitespace")
        );
        assert!(
            check_image_file_name("pi.bmp")
                .unwrap_err()
                .contains("extension")
        );
        assert!(check_image_file_name(".png").is_err());
        assert!(check_image_file_name("noext").is_err());
    }

    #[test]
    fn test_probe_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        image::RgbImage::new(40, 20).save(&path).unwrap();
        assert_eq!(probe_dimensions(&path).unwrap(), (40, 20));
    }

    #[test]
    fn test_probe_dimensions_garbage() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(probe_dimensions(&path).is_err());
    }
}
