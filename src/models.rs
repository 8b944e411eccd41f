use serde::{Deserialize, Serialize};

/// A stored key-value record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Record {
    pub key: String,
    pub value: String,
}

/// Response type for successful create operations
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateResponse {
    pub key: String,
    pub message: String,
}

/// Response type for successful update operations
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateResponse {
    pub key: String,
    pub message: String,
}

/// Response type for successful delete operations
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub key: String,
    pub message: String,
}
