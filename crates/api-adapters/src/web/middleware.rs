//! Cross-cutting layers: CORS policy and request counting.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::metrics::BoardMetrics;

/// CORS for browser clients. An empty list allows any origin.
pub fn cors_policy(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "skipping unparsable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Counts every routed request by method, route template and status.
/// Must be installed with `route_layer` so `MatchedPath` is available.
pub async fn track_requests(
    State(metrics): State<Arc<BoardMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;
    metrics.observe_request(&method, &route, response.status().as_u16());
    response
}
