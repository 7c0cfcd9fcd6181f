/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - 認証ポリシーと TokenVerifier
 * - Clone 前提で持つ (内部は Arc/Copy で cheap)
 */
use std::sync::Arc;

use crate::config::AuthPolicy;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub auth_policy: AuthPolicy,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(auth_policy: AuthPolicy, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            auth_policy,
            verifier,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth_policy", &self.auth_policy)
            .field("verifier", &self.verifier.name())
            .finish()
    }
}
