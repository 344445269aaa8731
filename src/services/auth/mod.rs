pub mod factory;
pub mod token_verifier;

pub use factory::build_token_verifier;
pub use token_verifier::{Claims, TokenError, TokenVerifier, VerificationKey};
