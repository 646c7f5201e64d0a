//! Authentication token storage.
//!
//! This module provides:
//! - `TokenStore`: where the API client keeps the bearer token
//! - `CookieJar`: the `auth` cookie (base64 value, 24 hour expiry), in memory
//!   or persisted to the data directory
//! - `KeyringTokenStore`: the same record kept in the OS keychain

pub mod cookie;
pub mod credentials;

pub use cookie::{AuthCookie, CookieJar, AUTH_COOKIE_NAME};
pub use credentials::KeyringTokenStore;

use anyhow::Result;

/// Storage for the bearer token the backend issues.
///
/// The API client is the only writer: the login response and any rotated
/// `token` field go through `set_token`, logout and 401 go through `clear`.
pub trait TokenStore: Send + Sync {
    /// Current token, or `None` if absent, expired, or unreadable.
    fn token(&self) -> Option<String>;

    /// Replace any stored token.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Forget the token.
    fn clear(&self) -> Result<()>;
}
