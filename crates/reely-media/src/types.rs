//! Content-type classification for uploads.
//!
//! Declared MIME strings are normalized before comparison and checked
//! against a per-kind allow-list. Accepted types map to a filename
//! extension for the generated asset name.

/// Content types accepted for thumbnail uploads.
pub const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Content types accepted for video uploads.
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4"];

/// Strip parameters from a declared MIME string and normalize case.
///
/// `image/PNG; charset=utf-8` becomes `image/png`. Malformed strings
/// normalize to something the allow-list will reject.
pub fn parse_media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Filename extension for an accepted media type.
///
/// Total over its inputs: unrecognized image types fall back to `jpg`.
pub fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "video/mp4" => "mp4",
        _ => "jpg",
    }
}
