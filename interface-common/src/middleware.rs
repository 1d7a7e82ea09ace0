use std::time::Duration;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use uuid::Uuid;

use crate::consts;
use crate::context::RequestContext;

/// Ensures every request carries an `x-request-id`: reuses the inbound
/// header when present, generates a UUID otherwise. The resulting
/// [`RequestContext`] is stored as a request extension and the ID is echoed
/// on the response header.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(consts::X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let context =
        RequestContext::from_headers(request.headers()).with_request_id(request_id.clone());
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(consts::X_REQUEST_ID, value);
    }
    response
}

/// Permissive CORS layer for browser-facing deployments: any origin with
/// credentials, the standard method set, and a 12 hour preflight cache.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::mirror_request())
        .max_age(Duration::from_secs(12 * 60 * 60))
}
