//! Bearer auth gate → AuthCtx を extensions に入れる
//!
//! - `OPTIONS` (preflight) は 200 / 空 body で即返す。検証も後段も通らない
//! - `Authorization: Bearer <token>` を取り出し、`TokenVerifier` に渡す
//! - 結果は必ず `AuthCtx` として extensions に載せる (claims 無しもあり得る)
//! - 拒否するかどうかは `AuthPolicy` 次第。既定 (Permissive) は常に後段へ流す
//!
//! CORS ヘッダはこの gate の外側 (`middleware::cors`) で付与するので、
//! preflight / 401 のレスポンスにも載る。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::auth::bearer::{AuthFailure, extract_bearer};
use crate::services::auth::{Claims, TokenVerifier};
use crate::state::AppState;

/// Apply the gate to every route currently in `router`.
///
/// ```ignore
/// let date = Router::new().route("/api/date", any(current_date));
/// let date = middleware::auth::gate::apply(date, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if *req.method() == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let auth_ctx = match authenticate(state.verifier.as_ref(), req.headers()).await {
        Ok(claims) => AuthCtx::with_claims(claims),
        Err(failure) => {
            log_failure(&failure, state.verifier.name());
            if state.auth_policy.is_enforcing() {
                return Err(AppError::Unauthorized(failure.reason()));
            }
            AuthCtx::anonymous()
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

async fn authenticate(
    verifier: &dyn TokenVerifier,
    headers: &HeaderMap,
) -> Result<Claims, AuthFailure> {
    let token = extract_bearer(headers)?;
    verifier.verify(token).await.map_err(AuthFailure::Invalid)
}

fn log_failure(failure: &AuthFailure, verifier: &'static str) {
    // Never log the token itself.
    match failure {
        AuthFailure::Missing => tracing::debug!("no bearer token presented"),
        AuthFailure::Malformed => tracing::warn!("malformed authorization header"),
        AuthFailure::Invalid(err) => {
            tracing::warn!(error = %err, verifier, "bearer token verification failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::routing::any;
    use tower::ServiceExt;

    use super::*;
    use crate::api::extractors::AuthCtxExtractor;
    use crate::config::{AuthPolicy, JwtKey, JwtSettings};
    use crate::services::auth::{NoopVerifier, jwt::JwtVerifier};

    // Echoes what the gate attached so the context is observable.
    async fn probe(AuthCtxExtractor(ctx): AuthCtxExtractor) -> String {
        match ctx.claims() {
            Some(claims) => format!("valid={} token={}", claims.valid, claims.token),
            None => "anonymous".to_string(),
        }
    }

    fn app(state: AppState) -> Router {
        let router = Router::new().route("/probe", any(probe));
        apply(router, state.clone()).with_state(state)
    }

    fn permissive() -> Router {
        app(AppState::new(AuthPolicy::Permissive, Arc::new(NoopVerifier)))
    }

    fn enforcing() -> Router {
        app(AppState::new(AuthPolicy::Enforce, Arc::new(NoopVerifier)))
    }

    async fn send(app: Router, method: Method, auth: Option<&str>) -> (StatusCode, String) {
        let mut req = Request::builder().method(method).uri("/probe");
        if let Some(auth) = auth {
            req = req.header("authorization", auth);
        }
        let res = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn attaches_claims_for_bearer_token() {
        let (status, body) = send(permissive(), Method::GET, Some("Bearer abc123")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "valid=true token=abc123");
    }

    #[tokio::test]
    async fn forwards_without_header() {
        let (status, body) = send(permissive(), Method::GET, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn forwards_malformed_headers_without_claims() {
        for auth in ["Basic xyz", "Bearer", "Bearer ", "Bearer  abc123"] {
            let (status, body) = send(permissive(), Method::POST, Some(auth)).await;

            assert_eq!(status, StatusCode::OK, "{auth:?}");
            assert_eq!(body, "anonymous", "{auth:?}");
        }
    }

    #[tokio::test]
    async fn preflight_short_circuits() {
        for app in [permissive(), enforcing()] {
            let (status, body) = send(app, Method::OPTIONS, Some("Basic xyz")).await;

            assert_eq!(status, StatusCode::OK);
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn enforcing_policy_rejects_missing_and_malformed() {
        for auth in [None, Some("Basic xyz"), Some("Bearer ")] {
            let (status, body) = send(enforcing(), Method::GET, auth).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{auth:?}");
            assert!(body.contains("UNAUTHORIZED"), "{body}");
        }

        let (status, body) = send(enforcing(), Method::GET, Some("Bearer abc123")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "valid=true token=abc123");
    }

    #[tokio::test]
    async fn verifier_rejection_depends_on_policy() {
        let jwt: Arc<dyn TokenVerifier> = Arc::new(
            JwtVerifier::new(&JwtSettings {
                key: JwtKey::HmacSecret("gate-test-secret".to_string()),
                issuer: "iss".to_string(),
                audience: "aud".to_string(),
                leeway_seconds: 0,
            })
            .unwrap(),
        );

        let lenient = app(AppState::new(AuthPolicy::Permissive, jwt.clone()));
        let (status, body) = send(lenient, Method::GET, Some("Bearer not-a-jwt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");

        let strict = app(AppState::new(AuthPolicy::Enforce, jwt));
        let (status, body) = send(strict, Method::GET, Some("Bearer not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("invalid bearer token"), "{body}");
    }

    #[tokio::test]
    async fn concurrent_requests_keep_their_own_context() {
        let app = permissive();
        let mut tasks = tokio::task::JoinSet::new();

        for i in 0..32 {
            let app = app.clone();
            tasks.spawn(async move {
                let auth = (i % 2 == 0).then(|| format!("Bearer token-{i}"));
                let (_, body) = send(app, Method::GET, auth.as_deref()).await;
                (i, body)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (i, body) = joined.unwrap();
            if i % 2 == 0 {
                assert_eq!(body, format!("valid=true token=token-{i}"));
            } else {
                assert_eq!(body, "anonymous");
            }
        }
    }
}
