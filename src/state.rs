/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone is cheap (Arc inside); everything here is read-only after startup
 */
use std::sync::Arc;

use crate::headers::HeaderFlattener;
use crate::services::auth::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub flattener: HeaderFlattener,
    pub header_prefix: Arc<str>,
}

impl AppState {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        flattener: HeaderFlattener,
        header_prefix: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            verifier,
            flattener,
            header_prefix: header_prefix.into(),
        }
    }
}
