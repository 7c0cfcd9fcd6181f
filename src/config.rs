/*
 * Responsibility
 * - 環境変数 (.env 含む) からの設定読み込み
 * - 認証ポリシー / verifier の選択と、その設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// What the auth gate does when no claims could be produced for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPolicy {
    /// Forward every request; claims are attached when available.
    #[default]
    Permissive,
    /// Reject requests without valid claims with 401.
    Enforce,
}

impl AuthPolicy {
    fn parse(raw: Option<String>) -> Result<Self, ConfigError> {
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(v) if v.eq_ignore_ascii_case("permissive") => Ok(Self::Permissive),
            Some(v) if v.eq_ignore_ascii_case("enforce") => Ok(Self::Enforce),
            Some(_) => Err(ConfigError::Invalid("AUTH_POLICY")),
        }
    }

    pub fn is_enforcing(&self) -> bool {
        matches!(self, Self::Enforce)
    }
}

/// Key material for JWT signature verification.
#[derive(Clone)]
pub enum JwtKey {
    /// Ed25519 public key (PEM), verified with EdDSA.
    Ed25519PublicPem(String),
    /// Shared secret, verified with HS256.
    HmacSecret(String),
}

impl fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
            Self::HmacSecret(_) => f.write_str("HmacSecret(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct JwtSettings {
    pub key: JwtKey,
    pub issuer: String,
    pub audience: String,
    pub leeway_seconds: u64,
}

#[derive(Clone)]
pub struct IntrospectionSettings {
    pub endpoint: Url,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for IntrospectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrospectionSettings")
            .field("endpoint", &self.endpoint.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| ".."))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Which `TokenVerifier` the gate consults.
#[derive(Clone, Debug, Default)]
pub enum VerifierConfig {
    #[default]
    Noop,
    Jwt(JwtSettings),
    Introspection(IntrospectionSettings),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub auth_policy: AuthPolicy,
    pub verifier: VerifierConfig,

    pub request_timeout: Duration,
    pub request_body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV"));
        let auth_policy = AuthPolicy::parse(lookup("AUTH_POLICY"))?;
        let verifier = verifier_from_lookup(&lookup)?;

        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?);
        let request_body_limit: usize =
            parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            auth_policy,
            verifier,
            request_timeout,
            request_body_limit,
        })
    }
}

fn verifier_from_lookup<F>(lookup: &F) -> Result<VerifierConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let kind = lookup("AUTH_VERIFIER").unwrap_or_default().to_ascii_lowercase();

    match kind.trim() {
        "" | "noop" | "none" => Ok(VerifierConfig::Noop),
        "jwt" => {
            let issuer = required(lookup, "AUTH_ISSUER")?;
            let audience = required(lookup, "AUTH_AUDIENCE")?;
            let leeway_seconds = parse_or(lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

            let pem = non_empty(lookup("ACCESS_JWT_PUBLIC_KEY_PEM"));
            let secret = non_empty(lookup("ACCESS_JWT_SECRET"));
            let key = match (pem, secret) {
                (Some(pem), None) => JwtKey::Ed25519PublicPem(pem.replace("\\n", "\n")),
                (None, Some(secret)) => JwtKey::HmacSecret(secret),
                (None, None) => return Err(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")),
                (Some(_), Some(_)) => return Err(ConfigError::Invalid("ACCESS_JWT_SECRET")),
            };

            Ok(VerifierConfig::Jwt(JwtSettings {
                key,
                issuer,
                audience,
                leeway_seconds,
            }))
        }
        "introspection" => {
            let raw = required(lookup, "INTROSPECTION_URL")?;
            let endpoint =
                Url::parse(&raw).map_err(|_| ConfigError::Invalid("INTROSPECTION_URL"))?;
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid("INTROSPECTION_URL"));
            }

            let timeout_secs: u64 = parse_or(lookup, "INTROSPECTION_TIMEOUT_SECONDS", 5)?;
            if timeout_secs == 0 {
                return Err(ConfigError::Invalid("INTROSPECTION_TIMEOUT_SECONDS"));
            }

            // A secret is only ever sent together with its client id.
            let client_id = non_empty(lookup("INTROSPECTION_CLIENT_ID"));
            let client_secret = non_empty(lookup("INTROSPECTION_CLIENT_SECRET"));
            if client_id.is_none() && client_secret.is_some() {
                return Err(ConfigError::Missing("INTROSPECTION_CLIENT_ID"));
            }

            Ok(VerifierConfig::Introspection(IntrospectionSettings {
                endpoint,
                client_id,
                client_secret,
                timeout: Duration::from_secs(timeout_secs),
            }))
        }
        _ => Err(ConfigError::Invalid("AUTH_VERIFIER")),
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key)).ok_or(ConfigError::Missing(key))
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match non_empty(lookup(key)) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
