use crate::error::{ApiError, ErrorBody};
use crate::models::KvPairResponse;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// GET /kvpair/:key handler - Retrieve a key value pair by key
#[utoipa::path(
    get,
    path = routes::KVPAIR_ITEM,
    params(
        ("key" = String, Path, description = "Key of the key value pair to return")
    ),
    responses(
        (status = 200, description = "Key value pair found", body = KvPairResponse),
        (status = 404, description = "Key value pair not found", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    ),
    tag = "kvpair"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<KvPairResponse>), ApiError> {
    match state.store.find_by_key(&key).await? {
        Some(record) => {
            tracing::info!("Retrieved key value pair with key: {}", key);
            Ok((StatusCode::OK, Json(record.into())))
        }
        None => Err(ApiError::NotFound(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Mode};
    use crate::handlers::create::create_handler;
    use crate::store::memory::MemoryStore;
    use axum::{
        Router,
        body::Body,
        http::Request,
        routing::{get, post},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn setup_test_app() -> Router {
        let config = Config {
            mode: Mode::Development,
            service_port: 5000,
            service_host: "0.0.0.0".to_string(),
            connection_string: "mongodb://localhost:27017/kvpairs".to_string(),
        };

        let state = AppState {
            store: Arc::new(MemoryStore::new()),
            config: Arc::new(config),
        };

        Router::new()
            .route(crate::routes::KVPAIR, post(create_handler))
            .route(crate::routes::KVPAIR_ITEM, get(get_handler))
            .with_state(state)
    }

    async fn create_pair(app: &Router, body: serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/kvpair")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_endpoint_success() {
        let app = setup_test_app();
        create_pair(&app, serde_json::json!({ "key": "foo", "value": "bar" })).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/kvpair/foo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: KvPairResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.key, "foo");
        assert_eq!(response_json.value, serde_json::json!("bar"));
        assert!(!response_json.id.is_empty());
    }

    #[tokio::test]
    async fn test_get_endpoint_not_found() {
        let app = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/kvpair/missingKey")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(error_body.name, "HttpError");
        assert_eq!(
            error_body.message,
            "Key value pair with key='missingKey' does not exist."
        );
    }

    #[tokio::test]
    async fn test_get_endpoint_complex_json() {
        let app = setup_test_app();

        let test_value = serde_json::json!({
            "string": "hello",
            "number": 123,
            "boolean": true,
            "null": null,
            "array": [1, 2, 3],
            "nested": {
                "key": "value"
            }
        });
        create_pair(
            &app,
            serde_json::json!({ "key": "complex", "value": test_value }),
        )
        .await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/kvpair/complex")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: KvPairResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.value, test_value);
    }
}
