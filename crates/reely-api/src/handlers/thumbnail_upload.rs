use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_field;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use reely_core::{AppError, VideoResponse};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v0/videos/{id}/thumbnail",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail uploaded", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_thumbnail"))]
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let mut video = state
        .videos
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    if video.user_id != user.user_id {
        return Err(HttpAppError::from(AppError::Unauthorized(
            "Not the video owner".to_string(),
        )));
    }

    let (data, content_type) = extract_multipart_field(multipart, "thumbnail").await?;
    let asset = state.pipeline.publish_thumbnail(&content_type, data).await?;

    video.thumbnail = Some(asset.media_ref.clone());
    video.touch();

    match state.videos.update_video(&video).await {
        Ok(updated) => {
            let response = state.pipeline.resolve(updated).await?;
            Ok(Json(response))
        }
        Err(e) => {
            // The asset is published but its record never landed; delete it
            // in the background so it does not orphan.
            if let Some(key) = asset.key {
                let pipeline = state.pipeline.clone();
                tokio::spawn(async move {
                    pipeline.discard(&key).await;
                });
            }
            Err(HttpAppError::from(e))
        }
    }
}
