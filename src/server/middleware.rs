use crate::API_VERSION;
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const X_API_VERSION: HeaderName = HeaderName::from_static("x-api-version");

/// Tags every response with a fresh request id and the API version, and logs
/// the request lifecycle.
pub async fn request_tracking(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    info!("Request {}: {} {}", request_id, request.method(), request.uri());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
        .headers_mut()
        .insert(X_API_VERSION, HeaderValue::from_static(API_VERSION));

    info!(
        "Request {} completed in {:.3}s with status {}",
        request_id,
        started.elapsed().as_secs_f64(),
        response.status().as_u16()
    );

    response
}

/// `*` allows any origin without credentials; an explicit list allows credentials.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .expose_headers([X_REQUEST_ID, X_API_VERSION]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
