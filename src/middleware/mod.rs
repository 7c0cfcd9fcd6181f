/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: bearer gate / cors: gated route の CORS ヘッダ / http: 横断的な HTTP レイヤ
 */
pub mod auth;
pub mod cors;
pub mod http;
