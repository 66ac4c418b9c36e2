use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use reely_core::{AppError, VideoResponse};
use serde::Deserialize;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Maximum number of records to return (capped at 100).
    pub limit: Option<i64>,
    /// Number of records to skip.
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v0/videos/{id}",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(operation = "get_video"))]
pub async fn get_video(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = state
        .videos
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    let response = state.pipeline.resolve(video).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v0/videos",
    tag = "videos",
    params(ListQuery),
    responses(
        (status = 200, description = "Videos owned by the caller", body = Vec<VideoResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let videos = state.videos.list_videos(user.user_id, limit, offset).await?;

    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(state.pipeline.resolve(video).await?);
    }

    Ok(Json(responses))
}
