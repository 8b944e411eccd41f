use crate::error::{ApiError, ErrorResponse};
use crate::models::Record;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// GET /records/:key handler - Retrieve a record
#[utoipa::path(
    get,
    path = routes::RECORD_ITEM,
    params(
        ("key" = String, Path, description = "Key of the record to retrieve")
    ),
    responses(
        (status = 200, description = "Record found", body = Record),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    match state.store.get(&key).await? {
        Some(record) => {
            tracing::info!("Successfully retrieved record with key: {}", key);
            Ok((StatusCode::OK, Json(record)))
        }
        None => {
            tracing::info!("Record not found with key: {}", key);
            Err(ApiError::KeyNotFound(key))
        }
    }
}
