/*
 * Responsibility
 * - GET /health (疎通用)。gate も CORS も通さない
 */

pub async fn health() -> &'static str {
    "ok"
}
