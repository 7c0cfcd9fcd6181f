/*
 * Responsibility
 * - URL 構造を定義
 *   - /health      : gate なし
 *   - /api/date    : 全メソッド。auth gate → CORS の順に包む (CORS が外側)
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::api::handlers::{date::current_date, health::health};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let date = Router::new().route("/api/date", any(current_date));
    let date = middleware::auth::gate::apply(date, state);
    let date = middleware::cors::apply(date);

    Router::new().route("/health", get(health)).merge(date)
}
