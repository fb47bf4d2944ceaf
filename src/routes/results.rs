use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::models::api::DeleteResponse;
use crate::models::classification::ClassificationResult;
use crate::models::job::Job;
use crate::routes::{parse_job_id, ApiError};
use crate::store::StoreError;

const JOB_NOT_FOUND: &str = "File ID not found";
const RESULT_NOT_FOUND: &str = "Result not found";

/// GET /api/upload-status/{file_id}: poll job status and progress.
pub async fn get_status(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job_id = parse_job_id(&file_id, JOB_NOT_FOUND)?;
    state
        .processor
        .status(job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(JOB_NOT_FOUND))
}

/// GET /api/results/{file_id}: fetch a completed classification.
pub async fn get_result(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let job_id = parse_job_id(&file_id, RESULT_NOT_FOUND)?;
    state
        .processor
        .result(job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(RESULT_NOT_FOUND))
}

/// DELETE /api/results/{file_id}: forget a finished job and its result.
pub async fn delete_result(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let job_id = parse_job_id(&file_id, RESULT_NOT_FOUND)?;
    match state.processor.forget(job_id).await {
        Ok(true) => Ok(Json(DeleteResponse {
            success: true,
            message: "Result deleted successfully".to_string(),
        })),
        Ok(false) => Err(ApiError::not_found(RESULT_NOT_FOUND)),
        Err(e @ StoreError::InProgress(_)) => Err(ApiError::new(StatusCode::CONFLICT, e.to_string())),
        Err(e) => Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
