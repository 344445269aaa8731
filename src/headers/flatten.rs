//! Claims -> flat header map.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::authorization::{AUTHORIZATION_HEADER, AuthorizationPolicy};
use super::key::format_key;
use super::transliterate;
use super::value::{FormattedValue, format_value};

/// Formatted key that triggers credential selection.
pub const COMMON_NAME_KEY: &str = "Common-Name";

/// Headers produced from one token. Sorted by name, so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardHeaders(BTreeMap<String, String>);

impl ForwardHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Walks verified claims and builds the outbound headers.
#[derive(Debug, Clone)]
pub struct HeaderFlattener {
    policy: Arc<AuthorizationPolicy>,
}

impl HeaderFlattener {
    pub fn new(policy: Arc<AuthorizationPolicy>) -> Self {
        Self { policy }
    }

    /// Flatten `claims` into headers named `header_prefix + <path>`.
    ///
    /// - Nested objects extend the prefix with `<Key>.`.
    /// - `Common-Name` (at any depth) sets `Authorization` from the allow list.
    /// - A read-only `request_host` then forces the restricted credential.
    pub fn flatten(
        &self,
        claims: &Map<String, Value>,
        header_prefix: &str,
        request_host: &str,
    ) -> ForwardHeaders {
        let mut out = ForwardHeaders::new();
        self.walk(claims, header_prefix, &mut out);

        if let Some(restricted) = self.policy.host_override(request_host) {
            debug!(host = %request_host, "read-only host, forcing restricted credential");
            out.insert(AUTHORIZATION_HEADER, restricted);
        }

        out
    }

    fn walk(&self, object: &Map<String, Value>, prefix: &str, out: &mut ForwardHeaders) {
        for (key, value) in object {
            let formatted_key = format_key(key);

            match format_value(value) {
                FormattedValue::Nested(nested) => {
                    let nested_prefix = format!("{prefix}{formatted_key}.");
                    self.walk(nested, &nested_prefix, out);
                }
                FormattedValue::Text(text) => {
                    let text = if transliterate::is_identity_key(&formatted_key) {
                        transliterate::normalize(&text)
                    } else {
                        text
                    };

                    let authorization = (formatted_key == COMMON_NAME_KEY).then(|| {
                        let allowed = self.policy.is_allowed(&text);
                        debug!(common_name = %text, allowed, "common-name found");
                        self.policy.resolve_identity(&text)
                    });

                    out.insert(format!("{prefix}{formatted_key}"), text);

                    if let Some(authorization) = authorization {
                        out.insert(AUTHORIZATION_HEADER, authorization);
                    }
                }
            }
        }
    }
}
