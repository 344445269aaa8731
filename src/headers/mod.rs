/*
 * Responsibility
 * - Verified claims -> headers for the upstream request (pure, no I/O)
 * - Service-account credential selection (Authorization)
 */
pub mod authorization;
pub mod flatten;
pub mod key;
pub mod transliterate;
pub mod value;

pub use authorization::{AUTHORIZATION_HEADER, AllowList, AuthorizationPolicy, Credentials};
pub use flatten::{ForwardHeaders, HeaderFlattener};
