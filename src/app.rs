use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_handler, get_handler, health_handler, remove_handler, update_handler,
};
use crate::routes;
use crate::state::AppState;

/// Assemble the application router: the key value pair API, the health
/// endpoint, interactive docs with the OpenAPI schema, and request logging
/// applied to every inbound request.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::KVPAIR, post(create_handler).put(update_handler))
        .route(
            routes::KVPAIR_ITEM,
            get(get_handler).delete(remove_handler),
        )
        .merge(SwaggerUi::new(routes::DOCS).url(routes::API_SCHEMA, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
