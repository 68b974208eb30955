use crate::error::{ApiError, ErrorBody};
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode};

/// DELETE /kvpair/:key handler - Delete a key value pair by key
#[utoipa::path(
    delete,
    path = routes::KVPAIR_ITEM,
    params(
        ("key" = String, Path, description = "Key of the key value pair to delete")
    ),
    responses(
        (status = 204, description = "Key value pair deleted"),
        (status = 404, description = "Key value pair not found", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    ),
    tag = "kvpair"
)]
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.store.remove_by_key(&key).await? {
        Some(_) => {
            tracing::info!("Removed key value pair with key: {}", key);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(key)),
    }
}
