//! Video repository: CRUD for the videos table.

use reely_core::models::{Video, VideoRow};
use reely_core::AppError;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for the videos table.
///
/// Reference columns are JSONB; encoding and decoding go through
/// `sqlx::types::Json` so the domain model never sees raw column shapes.
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a draft record and return the stored row.
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", video_id = %video.id))]
    pub async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let row: VideoRow = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            INSERT INTO videos (id, user_id, title, description, thumbnail, media, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, description, thumbnail, media, created_at, updated_at
            "#,
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.thumbnail.as_ref().map(Json))
        .bind(video.media.as_ref().map(Json))
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    /// Fetch a video by id.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.record_id = %id))]
    pub async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            SELECT id, user_id, title, description, thumbnail, media, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Video::from))
    }

    /// List an owner's records, newest first.
    #[tracing::instrument(skip(self), fields(db.table = "videos", user_id = %user_id, limit, offset))]
    pub async fn list_videos(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, AppError> {
        let rows: Vec<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            SELECT id, user_id, title, description, thumbnail, media, created_at, updated_at
            FROM videos
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Video::from).collect())
    }

    /// Persist the reference fields and the bumped `updated_at`.
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", video_id = %video.id))]
    pub async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                thumbnail = $4,
                media = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING id, user_id, title, description, thumbnail, media, created_at, updated_at
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.thumbnail.as_ref().map(Json))
        .bind(video.media.as_ref().map(Json))
        .bind(video.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Video::from)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))
    }
}
