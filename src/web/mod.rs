pub mod diet_plan;
pub mod metrics;
pub mod wizard;

use crate::state::SharedState;
use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

/// Headers browser clients attach to function calls.
const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type, x-supabase-client-platform, x-supabase-client-platform-version, x-supabase-client-runtime, x-supabase-client-runtime-version";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/functions/v1", diet_plan::router(state))
        .nest("/api", metrics::router().merge(wizard::router()))
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(ALLOWED_HEADERS),
                )),
        )
}

/// Any origin. Every OPTIONS request is answered here with an empty 200
/// before it reaches a route.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::list(
            ALLOWED_HEADERS.split(", ").map(HeaderName::from_static),
        ))
}
