//! Middleware Components
//!
//! CORS for the mini-app frontend and per-request tracking ids.

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowHeaders, Any, CorsLayer, ExposeHeaders};
use uuid::Uuid;

/// Request ID header key
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header carrying the signed init-data payload from the mini-app client.
pub const INIT_DATA_HEADER: &str = "x-telegram-initdata";

/// Create CORS middleware with configurable origins.
///
/// The mini-app frontend is served from the platform's webview on a foreign
/// origin, so the API must allow cross-origin POSTs carrying the init-data
/// header.
pub fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_headers = AllowHeaders::list([
        CONTENT_TYPE,
        HeaderName::from_static(INIT_DATA_HEADER),
    ]);
    let expose_headers = ExposeHeaders::list([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(allow_headers)
            .expose_headers(expose_headers)
    } else {
        // Production mode: specific origins
        CorsLayer::new()
            .allow_origin(
                allowed_origins
                    .iter()
                    .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(allow_headers)
            .expose_headers(expose_headers)
    }
}

/// Middleware to add a request ID to all requests.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    // Reuse the client's id when it sent one, otherwise mint a fresh one.
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Request ID wrapper for extracting in handlers.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);
