use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderName, header, request::Parts};

const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// Host the proxied request targets.
///
/// Behind a forward-auth proxy the original host arrives in `X-Forwarded-Host`;
/// falls back to `Host`, then to an empty string.
#[derive(Debug, Clone, Default)]
pub struct RequestHost(pub String);

impl<S> FromRequestParts<S> for RequestHost
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = [&X_FORWARDED_HOST, &header::HOST]
            .into_iter()
            .find_map(|name| parts.headers.get(name).and_then(|v| v.to_str().ok()))
            .unwrap_or_default();

        Ok(Self(host.to_string()))
    }
}
