//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limit (`HTTP_BODY_LIMIT_BYTES`)
//! - Global timeout (`HTTP_TIMEOUT_SECONDS`, 408 on elapse)

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn apply(router: Router, config: &Config) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        // Generate a request id if missing, then propagate it to the response.
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        // Login / register bodies are tiny; anything past the limit is 413.
        .layer(RequestBodyLimitLayer::new(config.http_body_limit_bytes))
        // Argon2 runs on the blocking pool; bound the whole request, not just I/O.
        .layer(TimeoutLayer::new(config.http_timeout))
        // Access log / tracing for all requests (x-request-id is already set here).
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
