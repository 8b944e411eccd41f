use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateResponse, Record};
use crate::routes;
use crate::state::AppState;
use crate::store::CreateOutcome;
use axum::{Json, extract::State, http::StatusCode};

/// POST /records handler - Create a new record
///
/// Inserts the record only if no record with that key exists; an occupied
/// key is reported as a conflict and the stored value is left untouched.
#[utoipa::path(
    post,
    path = routes::RECORDS,
    request_body = Record,
    responses(
        (status = 200, description = "Record created", body = CreateResponse),
        (status = 400, description = "Empty key", body = ErrorResponse),
        (status = 409, description = "Key already exists", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    if record.key.is_empty() {
        return Err(ApiError::EmptyKey);
    }

    match state.store.create(&record.key, &record.value).await? {
        CreateOutcome::Created => {
            tracing::info!("Successfully created record with key: {}", record.key);
            Ok((
                StatusCode::OK,
                Json(CreateResponse {
                    message: format!("Key '{}' added successfully", record.key),
                    key: record.key,
                }),
            ))
        }
        CreateOutcome::AlreadyExists => {
            tracing::info!("Record already exists with key: {}", record.key);
            Err(ApiError::KeyExists(record.key))
        }
    }
}
