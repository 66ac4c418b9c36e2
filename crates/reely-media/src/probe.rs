//! Typed deserialization of ffprobe stream metadata.

use crate::error::{MediaError, MediaResult};
use reely_core::AspectRatio;
use serde::Deserialize;

/// Top-level ffprobe JSON document (`-print_format json -show_streams`).
#[derive(Debug, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

/// A single stream entry. Fields ffprobe omits for non-video streams
/// deserialize as `None`.
#[derive(Debug, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Pixel dimensions of a probed video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Orientation class of these dimensions.
    ///
    /// Zero height is rejected when dimensions are extracted, so
    /// classification always succeeds here.
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::classify(self.width, self.height).unwrap_or(AspectRatio::Other)
    }
}

impl ProbeOutput {
    /// Extract dimensions from the first stream that reports both.
    ///
    /// Zero width or height is rejected; it would poison aspect-ratio
    /// classification downstream.
    pub fn dimensions(&self) -> MediaResult<Dimensions> {
        let stream = self
            .streams
            .iter()
            .find(|s| s.width.is_some() && s.height.is_some())
            .ok_or(MediaError::NoVideoStream)?;

        let width = stream.width.unwrap_or(0);
        let height = stream.height.unwrap_or(0);

        if width == 0 || height == 0 {
            return Err(MediaError::InvalidDimensions { width, height });
        }

        Ok(Dimensions { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_from_probe_json() {
        let json = r#"{
            "streams": [
                {"index": 0, "codec_type": "video", "width": 1920, "height": 1080}
            ]
        }"#;
        let parsed: ProbeOutput = serde_json::from_str(json).unwrap();
        let dims = parsed.dimensions().unwrap();
        assert_eq!(
            dims,
            Dimensions {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(dims.aspect_ratio(), AspectRatio::Landscape);
    }

    #[test]
    fn test_skips_streams_without_dimensions() {
        let json = r#"{
            "streams": [
                {"index": 0, "codec_type": "audio"},
                {"index": 1, "codec_type": "video", "width": 1080, "height": 1920}
            ]
        }"#;
        let parsed: ProbeOutput = serde_json::from_str(json).unwrap();
        let dims = parsed.dimensions().unwrap();
        assert_eq!(dims.aspect_ratio(), AspectRatio::Portrait);
    }

    #[test]
    fn test_no_streams_is_error() {
        let parsed: ProbeOutput = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            parsed.dimensions(),
            Err(MediaError::NoVideoStream)
        ));
    }

    #[test]
    fn test_zero_height_is_error() {
        let json = r#"{"streams": [{"width": 1920, "height": 0}]}"#;
        let parsed: ProbeOutput = serde_json::from_str(json).unwrap();
        assert!(matches!(
            parsed.dimensions(),
            Err(MediaError::InvalidDimensions {
                width: 1920,
                height: 0
            })
        ));
    }
}
