use anyhow::{Context, Result};
use chrono::Utc;
use keyring::Entry;
use tracing::warn;

use super::{AuthCookie, TokenStore};

const SERVICE_NAME: &str = "glowcart";

/// Keychain account the auth cookie record is filed under.
const ACCOUNT_NAME: &str = "auth";

/// Token store backed by the OS keychain.
///
/// Holds the same cookie record as [`CookieJar`](super::CookieJar) so the
/// 24 hour expiry still applies, but the value never touches the filesystem.
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::for_account(ACCOUNT_NAME)
    }

    /// Store under a different keychain account, e.g. one per backend.
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &self.account).context("Failed to create keyring entry")
    }

    fn load(&self) -> Result<Option<AuthCookie>> {
        match self.entry()?.get_password() {
            Ok(secret) => {
                let cookie = serde_json::from_str(&secret)
                    .context("Failed to parse auth cookie from keychain")?;
                Ok(Some(cookie))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve auth cookie from keychain"),
        }
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(cookie) => cookie?.token_at(Utc::now()),
            Err(e) => {
                warn!(error = %e, "Failed to read token from keychain");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let secret = serde_json::to_string(&AuthCookie::issue(token))?;
        self.entry()?
            .set_password(&secret)
            .context("Failed to store auth cookie in keychain")
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete auth cookie from keychain"),
        }
    }
}
