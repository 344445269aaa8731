/*
 * Responsibility
 * - Load settings from the environment (listen address, header prefix,
 *   service-account credentials, token verification key)
 * - Validate them (missing or invalid values fail startup)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use std::{env, fmt};

use axum::http::HeaderName;
use jsonwebtoken::Algorithm;

use crate::error::AppError;
use crate::headers::{AllowList, AuthorizationPolicy, Credentials};
use crate::middleware::http::HttpLimits;
use crate::services::auth::VerificationKey;

const DEFAULT_HEADER_PREFIX: &str = "X-Auth-";
const DEFAULT_READONLY_HOST_MARKER: &str = "headlamp-readonly";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub header_prefix: String,
    pub readonly_host_marker: String,
    pub admin_list: AllowList,
    pub credentials: Credentials,

    pub verification_key: VerificationKey,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub http_limits: HttpLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        // Every claim header is `<prefix><Key>`, so the prefix must itself be
        // usable at the start of a header name.
        let header_prefix =
            lookup("HEADER_PREFIX").unwrap_or_else(|| DEFAULT_HEADER_PREFIX.to_string());
        if HeaderName::from_bytes(format!("{header_prefix}X").as_bytes()).is_err() {
            return Err(ConfigError::Invalid("HEADER_PREFIX"));
        }

        // An empty marker would match every host.
        let readonly_host_marker = lookup("READONLY_HOST_MARKER")
            .unwrap_or_else(|| DEFAULT_READONLY_HOST_MARKER.to_string());
        if readonly_host_marker.trim().is_empty() {
            return Err(ConfigError::Invalid("READONLY_HOST_MARKER"));
        }

        let admin_list = AllowList::new(
            lookup("ADMIN_LIST")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );

        let admin_sa_token = required(&lookup, "ADMIN_SA_TOKEN")?;
        let read_sa_token = required(&lookup, "READ_SA_TOKEN")?;
        let credentials = Credentials::new(admin_sa_token, read_sa_token);

        let verification_key = match lookup("ACCESS_JWT_PUBLIC_KEY_PEM") {
            Some(pem) if !pem.trim().is_empty() => {
                let algorithm = match lookup("ACCESS_JWT_ALGORITHM") {
                    Some(alg) => Algorithm::from_str(alg.trim())
                        .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHM"))?,
                    None => Algorithm::RS256,
                };
                VerificationKey::PublicPem {
                    algorithm,
                    pem: pem.replace("\\n", "\n"),
                }
            }
            _ => VerificationKey::Secret(
                required(&lookup, "ACCESS_JWT_SECRET")
                    .map_err(|_| ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?,
            ),
        };

        let auth_issuer = lookup("AUTH_ISSUER").filter(|s| !s.trim().is_empty());
        let auth_audience = lookup("AUTH_AUDIENCE").filter(|s| !s.trim().is_empty());

        let access_token_leeway_seconds = lookup("ACCESS_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let defaults = HttpLimits::default();
        let http_limits = HttpLimits {
            body_limit_bytes: parse_or(&lookup, "BODY_LIMIT_BYTES", defaults.body_limit_bytes)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout.as_secs(),
            )?),
        };
        if http_limits.body_limit_bytes == 0 {
            return Err(ConfigError::Invalid("BODY_LIMIT_BYTES"));
        }
        if http_limits.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            header_prefix,
            readonly_host_marker,
            admin_list,
            credentials,
            verification_key,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            http_limits,
        })
    }

    pub fn authorization_policy(&self) -> AuthorizationPolicy {
        AuthorizationPolicy::new(
            self.admin_list.clone(),
            self.credentials.clone(),
            self.readonly_host_marker.clone(),
        )
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

// Unset -> default; set but unparsable -> Invalid.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        tracing::error!(error = %err, "configuration error");
        AppError::Internal
    }
}
