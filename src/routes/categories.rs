use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::models::api::CategoriesResponse;
use crate::routes::ApiError;

/// GET /api/categories: labels the classifier can assign.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let classifier = state.processor.classifier().ok_or_else(|| {
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Classifier is not initialized")
    })?;

    Ok(Json(CategoriesResponse {
        categories: classifier.categories(),
    }))
}
