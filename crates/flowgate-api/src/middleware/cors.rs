//! # CORS Middleware
//!
//! Stage one of the gatekeeper. Resolves the origin grant before anything
//! else runs, answers `OPTIONS` with 204, and stamps the CORS headers on
//! whatever response comes back from the inner stages, 401s included.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use flowgate_gate::cors::VARY;
use flowgate_gate::{CorsDecision, CorsPolicy};

/// Axum middleware applying a [`CorsPolicy`] found in request extensions.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let Some(policy) = request.extensions().get::<Arc<CorsPolicy>>().cloned() else {
        tracing::error!("CORS policy missing from request extensions; forwarding without CORS headers");
        return next.run(request).await;
    };

    // An `Origin` that is not valid UTF-8 can never match the allow-list.
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .map(|v| v.to_str().unwrap_or_default());
    let decision = policy.resolve(request.method().as_str(), origin);

    let mut response = if decision.preflight {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    apply(response.headers_mut(), &decision);
    response
}

fn apply(headers: &mut HeaderMap, decision: &CorsDecision) {
    for (name, value) in decision.headers() {
        let Ok(value) = HeaderValue::from_str(value) else {
            tracing::warn!(header = name, "dropping CORS header with invalid value");
            continue;
        };
        let name = HeaderName::from_static(name);
        if name == VARY {
            headers.append(name, value);
        } else {
            headers.insert(name, value);
        }
    }
}
