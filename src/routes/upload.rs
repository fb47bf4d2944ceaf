use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::api::UploadResponse;
use crate::models::job::JobStatus;
use crate::routes::ApiError;
use crate::services::processor::SubmitError;
use crate::services::staging;

/// POST /api/upload: accept a resume and start classifying it.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        upload = Some((filename, data.to_vec()));
    }

    let (raw_filename, data) = upload.ok_or_else(|| ApiError::bad_request("No file part"))?;
    if raw_filename.is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }

    let filename = staging::sanitize_filename(&raw_filename)
        .filter(|name| staging::is_allowed(name))
        .ok_or_else(|| {
            ApiError::bad_request("File type not allowed. Please upload a PDF file.")
        })?;

    let job_id = Uuid::new_v4();

    let path = state
        .staging
        .stage(job_id, &filename, &data)
        .await
        .map_err(|e| {
            tracing::error!(%job_id, error = %e, "Failed to stage upload");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store uploaded file")
        })?;

    if let Err(e) = state
        .processor
        .submit(job_id, &filename, path.clone())
        .await
    {
        state.staging.discard(&path).await;
        return Err(match e {
            SubmitError::Duplicate(_) => ApiError::new(StatusCode::CONFLICT, e.to_string()),
            SubmitError::QueueFull | SubmitError::ShutDown => {
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
        });
    }

    Ok(Json(UploadResponse {
        file_id: job_id,
        filename,
        status: JobStatus::Uploaded,
        message: "File uploaded successfully and processing started".to_string(),
    }))
}
