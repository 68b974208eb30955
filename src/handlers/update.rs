use crate::error::{ApiError, ErrorBody};
use crate::models::{KvPairBody, KvPairResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// PUT /kvpair handler - Update an existing key value pair
#[utoipa::path(
    put,
    path = routes::KVPAIR,
    request_body = KvPairBody,
    responses(
        (status = 200, description = "Key value pair updated", body = KvPairResponse),
        (status = 404, description = "Key value pair not found", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    ),
    tag = "kvpair"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Json(body): Json<KvPairBody>,
) -> Result<(StatusCode, Json<KvPairResponse>), ApiError> {
    let KvPairBody { key, value } = body;

    // Atomic find-and-replace; only the value changes, key and id stay put
    match state.store.update_value(&key, value).await? {
        Some(record) => {
            tracing::info!("Updated key value pair with key: {}", key);
            Ok((StatusCode::OK, Json(record.into())))
        }
        None => Err(ApiError::NotFound(key)),
    }
}
