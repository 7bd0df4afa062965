//! # Auth Middleware
//!
//! Stage two of the gatekeeper. Runs the [`AuthGuard`] against the request
//! method, path, and `Authorization` header. Rejections are terminal and
//! answered as `401 text/plain`; every other outcome forwards the request
//! unchanged.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use flowgate_gate::{AuthGuard, AuthOutcome};

/// Axum middleware enforcing an [`AuthGuard`] found in request extensions.
///
/// Fails closed: without a guard in extensions every request is rejected.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let Some(guard) = request.extensions().get::<Arc<AuthGuard>>().cloned() else {
        tracing::error!("auth guard missing from request extensions; rejecting request");
        return unauthorized_response("Unauthorized");
    };

    // A header that is not valid UTF-8 is treated as present but malformed.
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default());
    let outcome = guard.evaluate(request.method().as_str(), request.uri().path(), authorization);

    match outcome {
        AuthOutcome::Rejected(reason) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %reason,
                "authentication failed"
            );
            unauthorized_response(reason.public_message(guard.diagnostics()))
        }
        AuthOutcome::Exempt | AuthOutcome::Bypassed => {
            tracing::debug!(path = %request.uri().path(), ?outcome, "auth check skipped");
            next.run(request).await
        }
        AuthOutcome::OutOfScope | AuthOutcome::Authenticated => next.run(request).await,
    }
}

fn unauthorized_response(message: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use flowgate_gate::{AuthDiagnostics, BearerSecret, ExemptionProfile, GuardMode, PathRule};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn guard(diagnostics: AuthDiagnostics) -> AuthGuard {
        AuthGuard::new(
            vec![PathRule::parse("/api/agents/*").unwrap()],
            ExemptionProfile::Standard.exemptions(),
            GuardMode::Enforce(BearerSecret::new("my-secret").unwrap()),
            diagnostics,
        )
    }

    fn test_app(guard: Option<AuthGuard>) -> Router {
        let router = Router::new()
            .route("/api/agents", get(|| async { "ok" }))
            .route("/api/agents/health", get(|| async { "ok" }))
            .route("/open", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware));
        match guard {
            Some(guard) => router.layer(axum::Extension(Arc::new(guard))),
            None => router,
        }
    }

    async fn send(app: Router, uri: &str, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_bearer_token_accepted() {
        let app = test_app(Some(guard(AuthDiagnostics::Generic)));
        let (status, body) = send(app, "/api/agents", Some("Bearer my-secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn missing_header_detailed_message() {
        let app = test_app(Some(guard(AuthDiagnostics::Detailed)));
        let (status, body) = send(app, "/api/agents", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Unauthorized: Missing or invalid API key");
    }

    #[tokio::test]
    async fn wrong_token_detailed_message() {
        let app = test_app(Some(guard(AuthDiagnostics::Detailed)));
        let (status, body) = send(app, "/api/agents", Some("Bearer wrongtoken")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Unauthorized: Invalid API key");
    }

    #[tokio::test]
    async fn generic_diagnostics_hide_reason() {
        let app = test_app(Some(guard(AuthDiagnostics::Generic)));
        let (status, body) = send(app, "/api/agents", Some("Bearer wrongtoken")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Unauthorized");
    }

    #[tokio::test]
    async fn rejection_is_plain_text() {
        let app = test_app(Some(guard(AuthDiagnostics::Generic)));
        let response = app
            .oneshot(Request::builder().uri("/api/agents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"), "{content_type}");
    }

    #[tokio::test]
    async fn exempt_and_out_of_scope_paths_pass() {
        for path in ["/api/agents/health", "/open"] {
            let app = test_app(Some(guard(AuthDiagnostics::Generic)));
            let (status, _) = send(app, path, None).await;
            assert_eq!(status, StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn missing_guard_fails_closed() {
        let (status, body) = send(test_app(None), "/open", Some("Bearer my-secret")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Unauthorized");
    }
}
