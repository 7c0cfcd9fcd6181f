//! `Authorization: Bearer <token>` extraction.
//!
//! The header must split on a single space into exactly two parts, the first
//! being `Bearer` (case-sensitive) and the second a non-empty token. Anything
//! else is malformed, which the gate treats the same as a missing header
//! unless the policy enforces authentication.

use axum::http::{HeaderMap, header};

use crate::services::auth::VerifyError;

/// Why a request ended up without claims.
#[derive(Debug)]
pub enum AuthFailure {
    Missing,
    Malformed,
    Invalid(VerifyError),
}

impl AuthFailure {
    /// Client-facing reason used in the 401 body.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Missing => "missing bearer token",
            Self::Malformed => "malformed authorization header",
            Self::Invalid(_) => "invalid bearer token",
        }
    }
}

pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::Missing)?
        .to_str()
        .map_err(|_| AuthFailure::Malformed)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthFailure::Malformed),
    }
}
