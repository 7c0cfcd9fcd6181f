//! OAuth 2.0 token introspection (RFC 7662) verifier.
//!
//! Asks the authorization server whether a token is active. The bearer token
//! is sent in the form body, the client authenticates with HTTP basic when
//! credentials are configured.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::config::IntrospectionSettings;

use super::{Claims, TokenVerifier, VerifyError};

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Clone)]
pub struct IntrospectionVerifier {
    client: reqwest::Client,
    endpoint: Url,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl std::fmt::Debug for IntrospectionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntrospectionVerifier")
            .field("endpoint", &self.endpoint.as_str())
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl IntrospectionVerifier {
    pub fn new(settings: &IntrospectionSettings) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
        })
    }
}

#[async_trait]
impl TokenVerifier for IntrospectionVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        if token.is_empty() {
            return Err(VerifyError::EmptyToken);
        }

        let mut req = self
            .client
            .post(self.endpoint.clone())
            .form(&[("token", token), ("token_type_hint", "access_token")]);

        if let Some(client_id) = &self.client_id {
            req = req.basic_auth(client_id, self.client_secret.as_deref());
        }

        let body: IntrospectionResponse = req.send().await?.error_for_status()?.json().await?;

        if !body.active {
            return Err(VerifyError::Inactive);
        }

        tracing::debug!(sub = ?body.sub, "token introspected as active");

        Ok(Claims::for_token(token)
            .with_subject(body.sub.filter(|s| !s.is_empty()))
            .with_scope(body.scope))
    }

    fn name(&self) -> &'static str {
        "introspection"
    }
}
