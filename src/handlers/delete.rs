use crate::error::{ApiError, ErrorResponse};
use crate::models::DeleteResponse;
use crate::routes;
use crate::state::AppState;
use crate::store::WriteOutcome;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// DELETE /records/:key handler - Remove a record
#[utoipa::path(
    delete,
    path = routes::RECORD_ITEM,
    params(
        ("key" = String, Path, description = "Key of the record to delete")
    ),
    responses(
        (status = 200, description = "Record deleted", body = DeleteResponse),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    match state.store.delete(&key).await? {
        WriteOutcome::Applied => {
            tracing::info!("Successfully deleted record with key: {}", key);
            Ok((
                StatusCode::OK,
                Json(DeleteResponse {
                    message: format!("Key '{}' deleted successfully", key),
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
