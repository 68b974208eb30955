use utoipa::OpenApi;

use crate::error::{ErrorBody, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{KvPairBody, KvPairResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "kvpair-api",
        version = "1.0.0",
        description = "A simple JSON key-value store backed by MongoDB"
    ),
    paths(
        handlers::health::health_handler,
        handlers::get::get_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::remove::remove_handler
    ),
    components(
        schemas(
            KvPairBody,
            KvPairResponse,
            ErrorBody,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "kvpair", description = "Key value pair operations")
    )
)]
pub struct ApiDoc;
