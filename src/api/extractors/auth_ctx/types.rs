/*
 * Responsibility
 * - Handler から見える per-request コンテキストの型
 * - gate が毎リクエスト新しく作って extensions に格納する。リクエスト間で共有しない
 */

use crate::services::auth::Claims;

/// Per-request context attached by the auth gate.
///
/// `claims` is `None` when the caller presented no usable bearer token and
/// the policy let the request through anyway.
#[derive(Debug, Clone, Default)]
pub struct AuthCtx {
    claims: Option<Claims>,
}

impl AuthCtx {
    pub fn anonymous() -> Self {
        Self { claims: None }
    }

    pub fn with_claims(claims: Claims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    pub fn is_identified(&self) -> bool {
        self.claims.is_some()
    }
}
