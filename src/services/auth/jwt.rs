use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::{JwtKey, JwtSettings};

use super::{Claims, TokenVerifier, VerifyError};

/// Access token (JWT) claims we read.
///
/// NOTE:
/// - `aud` can be string or array; jsonwebtoken checks it via `Validation::set_audience`,
///   so it is not deserialized here.
#[derive(Debug, Clone, Deserialize)]
struct AccessTokenClaims {
    iss: String,
    sub: String,
    exp: u64,
    #[serde(default)]
    scope: Option<String>,
}

/// Signature-verifying access-token verifier (EdDSA public key or HS256 secret).
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(settings: &JwtSettings) -> Result<Self, VerifyError> {
        let (decoding_key, algorithm) = match &settings.key {
            JwtKey::Ed25519PublicPem(pem) => {
                let key = DecodingKey::from_ed_pem(pem.as_bytes()).map_err(|e| {
                    VerifyError::Setup(format!("invalid ed25519 public key pem: {e}"))
                })?;
                (key, Algorithm::EdDSA)
            }
            JwtKey::HmacSecret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = settings.leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    /// Verify signature + `exp`/`iss`/`aud`, then require non-empty `iss`/`sub`.
    async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        if token.is_empty() {
            return Err(VerifyError::EmptyToken);
        }

        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.iss.trim().is_empty() {
            return Err(VerifyError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(VerifyError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(VerifyError::EmptyClaim("exp"));
        }

        Ok(Claims::for_token(token)
            .with_subject(Some(claims.sub))
            .with_scope(claims.scope))
    }

    fn name(&self) -> &'static str {
        "jwt"
    }
}
