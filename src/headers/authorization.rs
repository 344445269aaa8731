//! Service-account credential selection.

use std::collections::HashSet;
use std::fmt;

/// Header the selected credential is written under.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Common names allowed the elevated credential. Exact, case-sensitive match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(HashSet<String>);

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, common_name: &str) -> bool {
        self.0.contains(common_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The two service-account bearer tokens.
///
/// - Token material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct Credentials {
    elevated: String,
    restricted: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(elevated: impl Into<String>, restricted: impl Into<String>) -> Self {
        Self {
            elevated: elevated.into(),
            restricted: restricted.into(),
        }
    }

    pub fn elevated_header(&self) -> String {
        bearer(&self.elevated)
    }

    pub fn restricted_header(&self) -> String {
        bearer(&self.restricted)
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Decides which credential a request receives.
///
/// Built once from configuration and shared read-only (`Arc`) by every request.
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    allow_list: AllowList,
    credentials: Credentials,
    read_only_marker: String,
}

impl AuthorizationPolicy {
    pub fn new(allow_list: AllowList, credentials: Credentials, read_only_marker: String) -> Self {
        Self {
            allow_list,
            credentials,
            read_only_marker,
        }
    }

    /// Full decision: the read-only host wins, then the allow list.
    pub fn resolve(&self, common_name: &str, request_host: &str) -> String {
        self.host_override(request_host)
            .unwrap_or_else(|| self.resolve_identity(common_name))
    }

    /// Identity-only decision, used while walking the claims.
    pub fn resolve_identity(&self, common_name: &str) -> String {
        if self.allow_list.contains(common_name) {
            self.credentials.elevated_header()
        } else {
            self.credentials.restricted_header()
        }
    }

    /// Restricted credential when `request_host` is a read-only deployment.
    pub fn host_override(&self, request_host: &str) -> Option<String> {
        self.is_read_only_host(request_host)
            .then(|| self.credentials.restricted_header())
    }

    pub fn is_read_only_host(&self, request_host: &str) -> bool {
        request_host.contains(&self.read_only_marker)
    }

    pub fn is_allowed(&self, common_name: &str) -> bool {
        self.allow_list.contains(common_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AuthorizationPolicy {
        AuthorizationPolicy::new(
            AllowList::new(["Alice Smith"]),
            Credentials::new("admin-token", "read-token"),
            "headlamp-readonly".to_string(),
        )
    }

    #[test]
    fn allow_listed_name_gets_elevated_credential() {
        assert_eq!(
            policy().resolve("Alice Smith", "headlamp.example.com"),
            "Bearer admin-token"
        );
    }

    #[test]
    fn other_names_get_restricted_credential() {
        let policy = policy();
        assert_eq!(policy.resolve("Bob Jones", "headlamp.example.com"), "Bearer read-token");
        // exact match only
        assert_eq!(policy.resolve("alice smith", "headlamp.example.com"), "Bearer read-token");
    }

    #[test]
    fn read_only_host_overrides_identity() {
        let policy = policy();
        assert_eq!(
            policy.resolve("Alice Smith", "headlamp-readonly.example.com"),
            "Bearer read-token"
        );
        assert_eq!(policy.host_override("headlamp.example.com"), None);
    }

    #[test]
    fn credentials_are_not_printed() {
        let printed = format!("{:?}", policy());
        assert!(!printed.contains("admin-token"));
        assert!(!printed.contains("read-token"));
    }
}
