/*
 * Responsibility
 * - ANY /api/date: 現在時刻 (RFC 850, UTC) を text/plain の body そのものとして返す
 * - AuthCtx は読むだけ (ログ用)。出力は caller によって変わらない
 */
use crate::api::extractors::AuthCtxExtractor;
use crate::services::timestamp;

pub async fn current_date(AuthCtxExtractor(ctx): AuthCtxExtractor) -> String {
    tracing::debug!(
        identified = ctx.is_identified(),
        subject = ctx.claims().and_then(|c| c.subject.as_deref()),
        "serving current date"
    );

    timestamp::now_rfc850()
}
