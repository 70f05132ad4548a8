//! Authentication for the HTTP search executor
//!
//! Supports: API Key, Basic, Bearer, OAuth2 client credentials, custom headers
//!
//! The `Authenticator` decorates every outgoing search request and caches
//! OAuth2 access tokens until shortly before they expire.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, Location};
