//! # Image and Asset Sources
//!
//! Resolves source strings (data URIs, file paths, raw base64) to bytes and
//! reads intrinsic image dimensions without decoding pixels. Layout only
//! needs the aspect ratio; pixel data is the renderer's business.

use std::io::Cursor;
use std::path::Path;

/// Format and intrinsic size of an image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageKind,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

/// Read format and dimensions from a source string.
///
/// Supported `src` formats:
/// - `data:<mime>;base64,...`: data URI
/// - File path starting with `/`, `./` or `../`: reads from disk
/// - Raw base64-encoded image data
pub fn load_image_info(src: &str) -> Result<ImageInfo, String> {
    let raw_bytes = read_source_bytes(src)?;
    inspect_image_bytes(&raw_bytes)
}

/// Intrinsic `(width, height)` in pixels.
pub fn load_image_dimensions(src: &str) -> Result<(u32, u32), String> {
    load_image_info(src).map(|info| (info.width_px, info.height_px))
}

/// Resolve the source string to raw bytes. Shared with font loading.
pub fn read_source_bytes(src: &str) -> Result<Vec<u8>, String> {
    if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| "Invalid data URI: missing comma".to_string())?;
        return base64_decode(&src[comma_pos + 1..]);
    }

    if src.starts_with("./") || src.starts_with("../") || Path::new(src).is_file() {
        return read_file(src);
    }

    // Base64 JPEG payloads start with "/9j/", so a leading '/' is only a
    // path once the payload fails to decode.
    if src.starts_with('/') {
        return base64_decode(src).or_else(|_| read_file(src));
    }

    base64_decode(src)
}

fn read_file(path: &str) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("Failed to read file '{}': {}", path, e))
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("Base64 decode error: {}", e))
}

/// Detect the format from magic bytes and read the header dimensions.
fn inspect_image_bytes(data: &[u8]) -> Result<ImageInfo, String> {
    if data.len() < 4 {
        return Err("Image data too short".to_string());
    }

    let format = if is_jpeg(data) {
        ImageKind::Jpeg
    } else if is_png(data) {
        ImageKind::Png
    } else if is_webp(data) {
        ImageKind::Webp
    } else {
        return Err("Unsupported image format (expected JPEG, PNG or WebP)".to_string());
    };

    let (width, height) = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Image format detection error: {}", e))?
        .into_dimensions()
        .map_err(|e| format!("Failed to read image dimensions: {}", e))?;

    Ok(ImageInfo {
        format,
        width_px: width,
        height_px: height,
    })
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

fn is_webp(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    fn b64(bytes: &[u8]) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_magic_bytes() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0xFF]));
        assert!(is_png(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_png(&[0x89, 0x50]));
        assert!(is_webp(b"RIFF\0\0\0\0WEBPVP8 "));
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(load_image_info("data:image/png;base64").is_err());
    }

    #[test]
    fn test_too_short_data() {
        assert!(inspect_image_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_unsupported_format() {
        assert!(inspect_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
    }

    #[test]
    fn test_png_dimensions_from_data_uri() {
        let uri = format!("data:image/png;base64,{}", b64(&png_bytes(4, 3)));
        let info = load_image_info(&uri).unwrap();
        assert_eq!(info.format, ImageKind::Png);
        assert_eq!((info.width_px, info.height_px), (4, 3));
    }

    #[test]
    fn test_jpeg_dimensions_from_raw_base64() {
        let img = image::RgbImage::from_fn(2, 5, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 5, image::ColorType::Rgb8)
            .unwrap();

        let encoded = b64(&buf);
        assert!(encoded.starts_with("/9j/"));
        assert_eq!(load_image_dimensions(&encoded).unwrap(), (2, 5));
    }

    #[test]
    fn test_dimensions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, png_bytes(7, 2)).unwrap();
        let src = path.to_string_lossy().to_string();
        assert_eq!(load_image_dimensions(&src).unwrap(), (7, 2));
    }

    #[test]
    fn test_missing_file() {
        let err = read_source_bytes("/definitely/not/here.png").unwrap_err();
        assert!(err.starts_with("Failed to read file"));
    }
}
