use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::AuthCtx;

/// Handler で AuthCtx を受け取るための extractor
///
/// gate を通っていれば必ず AuthCtx が入っている。入っていない (gate の外の route)
/// 場合は anonymous 扱いにする。
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .unwrap_or_else(AuthCtx::anonymous);

        Ok(AuthCtxExtractor(ctx))
    }
}
