use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::fmt;

/// Verified token payload, keys in token order.
pub type Claims = Map<String, Value>;

// Errors returned by bearer-token verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
}

/// Key material the verifier checks signatures against.
#[derive(Clone)]
pub enum VerificationKey {
    /// HMAC shared secret (HS256).
    Secret(String),
    /// PEM public key for an asymmetric algorithm.
    PublicPem { algorithm: Algorithm, pem: String },
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Secret(_) => f.write_str("Secret(..)"),
            Self::PublicPem { algorithm, .. } => f
                .debug_struct("PublicPem")
                .field("algorithm", algorithm)
                .finish_non_exhaustive(),
        }
    }
}

/// Access-token verifier.
///
/// - Checks signature and `exp` (plus `iss` / `aud` when configured).
/// - Hands back the whole payload; mapping claims to headers happens elsewhere.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(
        key: &VerificationKey,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, TokenError> {
        let (decoding_key, algorithm) = match key {
            VerificationKey::Secret(secret) => (
                DecodingKey::from_secret(secret.as_bytes()),
                Algorithm::HS256,
            ),
            VerificationKey::PublicPem { algorithm, pem } => {
                (decoding_key_from_pem(*algorithm, pem)?, *algorithm)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            // Tokens may carry any `aud` when none is configured.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

fn decoding_key_from_pem(algorithm: Algorithm, pem: &str) -> Result<DecodingKey, TokenError> {
    let pem = pem.as_bytes();
    let key = match algorithm {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
        other => {
            return Err(TokenError::InvalidKey(format!(
                "{other:?} does not use a public key"
            )));
        }
    };
    key.map_err(|e| TokenError::InvalidKey(format!("invalid {algorithm:?} public key pem: {e}")))
}
