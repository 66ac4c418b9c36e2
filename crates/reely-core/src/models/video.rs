use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::storage::MediaRef;

/// A video record as stored in the database.
///
/// `user_id` is set at creation and never changes; it is the sole
/// authorization input for mutating uploads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<MediaRef>,
    pub media: Option<MediaRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Build a fresh draft record for the given owner.
    pub fn new_draft(user_id: Uuid, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Video {
            id: Uuid::new_v4(),
            user_id,
            title,
            description,
            thumbnail: None,
            media: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the updated-at timestamp; call before persisting a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Database row shape for a video. JSONB reference columns are decoded
/// through `sqlx::types::Json` and unwrapped into the domain model.
#[cfg(feature = "sqlx")]
#[derive(Debug, sqlx::FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<sqlx::types::Json<MediaRef>>,
    pub media: Option<sqlx::types::Json<MediaRef>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "sqlx")]
impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            thumbnail: row.thumbnail.map(|j| j.0),
            media: row.media.map(|j| j.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for creating a draft video record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    #[schema(example = "Boots learns aqueducts")]
    pub title: String,
    pub description: Option<String>,
}

/// Client-facing video representation. Object-store references have been
/// resolved to signed URLs by the read path before this is serialized.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    /// Assemble a response from a record and its already-resolved URLs.
    pub fn resolved(
        video: Video,
        thumbnail_url: Option<String>,
        media_url: Option<String>,
    ) -> Self {
        VideoResponse {
            id: video.id,
            user_id: video.user_id,
            title: video.title,
            description: video.description,
            thumbnail_url,
            media_url,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}
