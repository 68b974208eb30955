use crate::error::{ApiError, ErrorBody};
use crate::models::{KvPairBody, KvPairResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// POST /kvpair handler - Add a new key value pair
#[utoipa::path(
    post,
    path = routes::KVPAIR,
    request_body = KvPairBody,
    responses(
        (status = 201, description = "Key value pair created", body = KvPairResponse),
        (status = 409, description = "Key value pair already exists", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    ),
    tag = "kvpair"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Json(body): Json<KvPairBody>,
) -> Result<(StatusCode, Json<KvPairResponse>), ApiError> {
    let KvPairBody { key, value } = body;

    // Existence check first, for a clean 409 in the common case. Two
    // concurrent creators can both pass it; the store's unique index is the
    // authoritative guard, and its DuplicateKey maps to the same 409.
    if state.store.find_by_key(&key).await?.is_some() {
        return Err(ApiError::AlreadyExists(key));
    }

    let record = state.store.insert(&key, value).await?;
    tracing::info!("Created key value pair with key: {}", key);
    Ok((StatusCode::CREATED, Json(record.into())))
}
