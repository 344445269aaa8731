/*
 * Responsibility
 * - GET / : verify the bearer token, flatten its claims into headers
 * - Answer 200 with those headers; the proxy copies them upstream
 */
use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};

use crate::api::extractors::{BearerToken, RequestHost};
use crate::error::AppError;
use crate::headers::ForwardHeaders;
use crate::state::AppState;

pub async fn forward_auth(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    RequestHost(host): RequestHost,
) -> Result<impl IntoResponse, AppError> {
    let claims = match state.verifier.verify(&token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    let headers = state.flattener.flatten(&claims, &state.header_prefix, &host);
    tracing::debug!(host = %host, count = headers.len(), "claims flattened");

    Ok((StatusCode::OK, to_header_map(&headers)))
}

/// Claims may produce names or values HTTP cannot carry; those entries are skipped.
///
/// HTTP header names are case-insensitive while claim keys are not, so
/// `givenName` and `givenname` land on the same header: the one sorting last
/// by exact name wins and the collision is logged.
fn to_header_map(headers: &ForwardHeaders) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            tracing::warn!(header = %name, "skipping claim header with invalid name");
            continue;
        };
        let Ok(header_value) = HeaderValue::from_bytes(value.as_bytes()) else {
            tracing::warn!(header = %name, "skipping claim header with invalid value");
            continue;
        };
        if map.insert(header_name, header_value).is_some() {
            tracing::warn!(
                header = %name,
                "claim headers differ only by case, keeping the last one"
            );
        }
    }
    map
}
