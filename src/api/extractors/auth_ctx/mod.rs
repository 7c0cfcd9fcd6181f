/*!
 * Request context extractor
 *
 * Responsibility:
 * - gate が request extensions に載せた AuthCtx を handler に渡す
 * - axum 依存は core に、型定義は types に分離する
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
