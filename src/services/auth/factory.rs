/// Factory: build `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::TokenVerifier;

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, AppError> {
    let verifier = TokenVerifier::new(
        &config.verification_key,
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to build token verifier");
        AppError::Internal
    })?;

    Ok(Arc::new(verifier))
}
