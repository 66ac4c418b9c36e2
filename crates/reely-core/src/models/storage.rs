//! Storage mode and structured media references.
//!
//! A `MediaRef` records where an uploaded asset lives. It replaces ad hoc
//! string encodings (comma-separated bucket/key pairs, bare URLs) with a
//! tagged enum that is stored as JSONB and resolved per mode on read.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Storage mode for published assets.
///
/// One mode is active per deployment; the upload pipeline is the same code
/// path in all three, only staging and reference encoding differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Thumbnails are inlined as data URIs; video files use the local publisher.
    Inline,
    /// Files are written under a public assets directory and served by URL.
    Local,
    /// Files are published to an object store and read through signed URLs.
    S3,
}

impl FromStr for StorageMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inline" => Ok(StorageMode::Inline),
            "local" => Ok(StorageMode::Local),
            "s3" => Ok(StorageMode::S3),
            _ => Err(anyhow::anyhow!("Invalid storage mode: {}", s)),
        }
    }
}

impl Display for StorageMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageMode::Inline => write!(f, "inline"),
            StorageMode::Local => write!(f, "local"),
            StorageMode::S3 => write!(f, "s3"),
        }
    }
}

/// A reference to a published asset.
///
/// Exactly one variant is produced per deployment mode for a given field:
/// `Inline` for data-URI thumbnails, `Url` for files served from the local
/// assets route, `Object` for object-store keys that are resolved to signed
/// URLs on every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaRef {
    Inline { content_type: String, data: String },
    Url { url: String },
    Object { bucket: String, key: String },
}

impl MediaRef {
    /// Build an inline reference by base64-encoding the raw bytes.
    pub fn inline(content_type: impl Into<String>, bytes: &[u8]) -> Self {
        MediaRef::Inline {
            content_type: content_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        MediaRef::Url { url: url.into() }
    }

    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        MediaRef::Object {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Render the self-contained form of this reference, if it has one.
    ///
    /// `Inline` renders as a `data:` URI and `Url` passes through; `Object`
    /// returns `None` because it must be signed before it is client-visible.
    pub fn public_url(&self) -> Option<String> {
        match self {
            MediaRef::Inline { content_type, data } => {
                Some(format!("data:{};base64,{}", content_type, data))
            }
            MediaRef::Url { url } => Some(url.clone()),
            MediaRef::Object { .. } => None,
        }
    }

    pub fn object_key(&self) -> Option<&str> {
        match self {
            MediaRef::Object { key, .. } => Some(key),
            _ => None,
        }
    }
}
