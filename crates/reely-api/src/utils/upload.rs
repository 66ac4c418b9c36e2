//! Common utilities for file upload handlers

use axum::extract::Multipart;
use reely_core::AppError;

/// Extract file data and declared content type from a multipart form.
/// Only one field with the expected name is accepted; duplicates are rejected.
pub async fn extract_multipart_field(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<(Vec<u8>, String), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if name == field_name {
            if file_data.is_some() {
                return Err(AppError::BadRequest(format!(
                    "Multiple '{}' fields are not allowed; send exactly one",
                    field_name
                )));
            }
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            file_data = Some(data.to_vec());
        }
    }

    let file_data = file_data.ok_or_else(|| {
        AppError::BadRequest(format!("Missing multipart field '{}'", field_name))
    })?;
    let content_type = content_type.ok_or_else(|| {
        AppError::BadRequest(format!(
            "Multipart field '{}' carries no content type",
            field_name
        ))
    })?;

    Ok((file_data, content_type))
}
