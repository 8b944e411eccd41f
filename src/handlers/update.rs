use crate::error::{ApiError, ErrorResponse};
use crate::models::UpdateResponse;
use crate::routes;
use crate::state::AppState;
use crate::store::WriteOutcome;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// PATCH /records/:key/:value handler - Replace the value of an existing record
#[utoipa::path(
    patch,
    path = routes::RECORD_UPDATE,
    params(
        ("key" = String, Path, description = "Key of the record to update"),
        ("value" = String, Path, description = "New value for the record")
    ),
    responses(
        (status = 200, description = "Record updated", body = UpdateResponse),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path((key, value)): Path<(String, String)>,
) -> Result<(StatusCode, Json<UpdateResponse>), ApiError> {
    match state.store.update(&key, &value).await? {
        WriteOutcome::Applied => {
            tracing::info!("Successfully updated record with key: {}", key);
            Ok((
                StatusCode::OK,
                Json(UpdateResponse {
                    message: format!("Value of key '{}' updated successfully", key),
                    key,
                }),
            ))
        }
        WriteOutcome::NotFound => {
            tracing::info!("Record not found with key: {}", key);
            Err(ApiError::KeyNotFound(key))
        }
    }
}
