use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use reely_core::{AppError, CreateVideoRequest, Video, VideoResponse};

#[utoipa::path(
    post,
    path = "/api/v0/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft video created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_video"))]
pub async fn create_video(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(HttpAppError::from(AppError::InvalidInput(
            "Title must not be empty".to_string(),
        )));
    }

    let video = Video::new_draft(user.user_id, title.to_string(), request.description);
    let created = state.videos.create_video(&video).await?;

    tracing::info!(video_id = %created.id, user_id = %user.user_id, "Created draft video");

    let response = state.pipeline.resolve(created).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
