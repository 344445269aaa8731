/*!
 * Request extractors for the forward-auth endpoint
 *
 * Public API:
 * - BearerToken
 * - RequestHost
 */

mod bearer;
mod host;

pub use bearer::BearerToken;
pub use host::RequestHost;
