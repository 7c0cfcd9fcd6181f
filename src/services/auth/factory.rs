/// Factory: build the configured `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::VerifierConfig;
use crate::services::auth::{
    NoopVerifier, TokenVerifier, VerifyError, introspection::IntrospectionVerifier,
    jwt::JwtVerifier,
};

pub fn build_token_verifier(config: &VerifierConfig) -> Result<Arc<dyn TokenVerifier>, VerifyError> {
    let verifier: Arc<dyn TokenVerifier> = match config {
        VerifierConfig::Noop => Arc::new(NoopVerifier),
        VerifierConfig::Jwt(settings) => Arc::new(JwtVerifier::new(settings)?),
        VerifierConfig::Introspection(settings) => Arc::new(IntrospectionVerifier::new(settings)?),
    };

    Ok(verifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JwtKey, JwtSettings};

    #[test]
    fn builds_each_kind() {
        assert_eq!(build_token_verifier(&VerifierConfig::Noop).unwrap().name(), "noop");

        let jwt = VerifierConfig::Jwt(JwtSettings {
            key: JwtKey::HmacSecret("secret".to_string()),
            issuer: "iss".to_string(),
            audience: "aud".to_string(),
            leeway_seconds: 0,
        });
        assert_eq!(build_token_verifier(&jwt).unwrap().name(), "jwt");
    }

    #[test]
    fn surfaces_bad_key_material() {
        let jwt = VerifierConfig::Jwt(JwtSettings {
            key: JwtKey::Ed25519PublicPem("garbage".to_string()),
            issuer: "iss".to_string(),
            audience: "aud".to_string(),
            leeway_seconds: 0,
        });
        assert!(build_token_verifier(&jwt).is_err());
    }
}
