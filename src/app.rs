/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → TokenVerifier 生成 → Router 組み立て
 * - HTTP レイヤ (request id / trace / limit / timeout) の適用
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, services::auth, state::AppState};

fn init_tracing() {
    // RUST_LOG wins when set. Ex:
    // RUST_LOG=info,date_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing; stderr may not be collected.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(!config.app_env.is_production());

    let state = build_state(&config)?;
    tracing::info!(
        app_env = ?config.app_env,
        auth_policy = ?config.auth_policy,
        verifier = state.verifier.name(),
        "starting date API on {}",
        config.addr
    );

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let verifier =
        auth::build_token_verifier(&config.verifier).context("building token verifier")?;

    Ok(AppState::new(config.auth_policy, verifier))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone()).with_state(state);
    middleware::http::apply(router, config)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::http::REQUEST_ID_HEADER;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
    }

    fn app(pairs: &[(&str, &str)]) -> Router {
        let config = config(pairs);
        let state = build_state(&config).unwrap();
        build_router(state, &config)
    }

    #[tokio::test]
    async fn generates_request_id_when_absent() {
        let res = app(&[])
            .oneshot(
                Request::builder()
                    .uri("/api/date")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let id = res.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn propagates_incoming_request_id() {
        let res = app(&[])
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/date")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[REQUEST_ID_HEADER], "req-123");
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let res = app(&[("REQUEST_BODY_LIMIT_BYTES", "8")])
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/date")
                    .header(header::CONTENT_LENGTH, "64")
                    .body(Body::from(vec![b'x'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn enforce_policy_from_config() {
        let res = app(&[("AUTH_POLICY", "enforce")])
            .oneshot(
                Request::builder()
                    .uri("/api/date")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
