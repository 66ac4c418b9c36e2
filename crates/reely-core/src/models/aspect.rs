//! Aspect-ratio classification for uploaded videos.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Orientation class of a video, derived from its pixel dimensions.
///
/// Published video keys are prefixed with the class name so assets group
/// by orientation in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Other,
}

impl AspectRatio {
    /// Classify pixel dimensions, or `None` when `height` is zero.
    ///
    /// The ratio is rounded to two decimal places before comparison, so
    /// near-16:9 encodes (1920x1080, 1280x720) land in the same class.
    pub fn classify(width: u32, height: u32) -> Option<Self> {
        if height == 0 {
            return None;
        }
        let ratio = width as f64 / height as f64;
        match (ratio * 100.0).round() as i64 {
            178 => Some(AspectRatio::Landscape),
            56 => Some(AspectRatio::Portrait),
            _ => Some(AspectRatio::Other),
        }
    }

    /// Conventional ratio label ("16:9", "9:16", "other").
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Other => "other",
        }
    }

    /// Storage key prefix for published video files.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_landscape() {
        assert_eq!(
            AspectRatio::classify(1920, 1080),
            Some(AspectRatio::Landscape)
        );
        assert_eq!(
            AspectRatio::classify(1280, 720),
            Some(AspectRatio::Landscape)
        );
    }

    #[test]
    fn test_classify_portrait() {
        assert_eq!(
            AspectRatio::classify(1080, 1920),
            Some(AspectRatio::Portrait)
        );
        // 608/1080 rounds to 0.56
        assert_eq!(AspectRatio::classify(608, 1080), Some(AspectRatio::Portrait));
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(AspectRatio::classify(640, 480), Some(AspectRatio::Other));
        assert_eq!(AspectRatio::classify(1000, 1000), Some(AspectRatio::Other));
        assert_eq!(AspectRatio::classify(0, 1080), Some(AspectRatio::Other));
    }

    #[test]
    fn test_classify_zero_height() {
        assert_eq!(AspectRatio::classify(1920, 0), None);
    }

    #[test]
    fn test_key_prefix_and_label() {
        assert_eq!(AspectRatio::Landscape.key_prefix(), "landscape");
        assert_eq!(AspectRatio::Portrait.label(), "9:16");
        assert_eq!(AspectRatio::Other.to_string(), "other");
    }
}
