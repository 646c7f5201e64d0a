use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TokenStore;

/// Name of the cookie holding the bearer token.
pub const AUTH_COOKIE_NAME: &str = "auth";

/// Cookie jar file name in the data directory
const COOKIE_FILE: &str = "cookies.json";

/// Auth cookie lifetime, fixed at write time.
const AUTH_COOKIE_TTL_HOURS: i64 = 24;

/// HTTP date format used by the `Expires` attribute.
const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// The `auth` cookie as the browser would hold it.
///
/// The value is base64 of the token. That hides the token from a casual
/// glance and nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCookie {
    pub value: String,
    pub path: String,
    pub same_site: String,
    pub secure: bool,
    pub expires: DateTime<Utc>,
}

impl AuthCookie {
    pub fn issue(token: &str) -> Self {
        Self::issue_at(token, Utc::now())
    }

    pub fn issue_at(token: &str, now: DateTime<Utc>) -> Self {
        Self {
            value: general_purpose::STANDARD.encode(token),
            path: "/".to_string(),
            same_site: "Strict".to_string(),
            secure: true,
            expires: now + Duration::hours(AUTH_COOKIE_TTL_HOURS),
        }
    }

    /// A cookie that expired at the Unix epoch, used to clear the token.
    pub fn expired() -> Self {
        Self {
            value: String::new(),
            path: "/".to_string(),
            same_site: "Strict".to_string(),
            secure: true,
            expires: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    /// Decode the token, or `None` if the value is not valid base64 UTF-8.
    pub fn decode(&self) -> Option<String> {
        if self.value.is_empty() {
            return None;
        }
        let bytes = general_purpose::STANDARD.decode(&self.value).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// Token held by this cookie if it is still live at `now`.
    pub fn token_at(&self, now: DateTime<Utc>) -> Option<String> {
        if self.is_expired_at(now) {
            return None;
        }
        self.decode()
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; Path={}; SameSite={}{}; Expires={}",
            AUTH_COOKIE_NAME,
            self.value,
            self.path,
            self.same_site,
            if self.secure { "; Secure" } else { "" },
            self.expires.format(COOKIE_DATE_FORMAT)
        )
    }
}

/// Token store holding the `auth` cookie, in memory or persisted to disk.
pub struct CookieJar {
    path: Option<PathBuf>,
    cookie: Mutex<Option<AuthCookie>>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            cookie: Mutex::new(None),
        }
    }

    /// Open the jar stored in `data_dir`, starting empty if the file is
    /// missing or unreadable.
    pub fn open(data_dir: PathBuf) -> Self {
        let path = data_dir.join(COOKIE_FILE);
        let cookie = match Self::read(&path) {
            Ok(cookie) => cookie,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cookie jar");
                None
            }
        };
        Self {
            path: Some(path),
            cookie: Mutex::new(cookie),
        }
    }

    fn read(path: &PathBuf) -> Result<Option<AuthCookie>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context("Failed to read cookie jar")?;
        let cookie = serde_json::from_str(&contents).context("Failed to parse cookie jar")?;
        Ok(Some(cookie))
    }

    /// Current cookie record, expired or not.
    pub fn cookie(&self) -> Option<AuthCookie> {
        self.cookie
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Memory is updated before the file, so a failed write still leaves
    /// the live record current.
    fn store(&self, cookie: AuthCookie) -> Result<()> {
        *self
            .cookie
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(cookie.clone());

        if let Some(ref path) = self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).context("Failed to create cookie jar directory")?;
            }
            let contents = serde_json::to_string_pretty(&cookie)?;
            std::fs::write(path, contents).context("Failed to write cookie jar")?;
        }
        Ok(())
    }
}

impl TokenStore for CookieJar {
    fn token(&self) -> Option<String> {
        self.cookie()?.token_at(Utc::now())
    }

    fn set_token(&self, token: &str) -> Result<()> {
        debug!("Writing auth cookie");
        self.store(AuthCookie::issue(token))
    }

    fn clear(&self) -> Result<()> {
        debug!("Expiring auth cookie");
        self.store(AuthCookie::expired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "glowcart-cookie-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_token_round_trip() {
        let jar = CookieJar::in_memory();
        assert_eq!(jar.token(), None);

        jar.set_token("abc123").unwrap();
        assert_eq!(jar.token().as_deref(), Some("abc123"));
        assert_eq!(jar.cookie().unwrap().value, "YWJjMTIz");
    }

    #[test]
    fn test_round_trip_arbitrary_ascii() {
        let jar = CookieJar::in_memory();
        let token = "eyJhbGciOiJIUzI1NiJ9.e30.~!@#$%^&*()_+ =;,";
        jar.set_token(token).unwrap();
        assert_eq!(jar.token().as_deref(), Some(token));
    }

    #[test]
    fn test_set_overwrites() {
        let jar = CookieJar::in_memory();
        jar.set_token("first").unwrap();
        jar.set_token("second").unwrap();
        assert_eq!(jar.token().as_deref(), Some("second"));
    }

    #[test]
    fn test_clear_expires_cookie() {
        let jar = CookieJar::in_memory();
        jar.set_token("xyz").unwrap();
        jar.clear().unwrap();
        assert_eq!(jar.token(), None);
        assert_eq!(jar.cookie().unwrap().expires, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_expiry_after_24_hours() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let cookie = AuthCookie::issue_at("abc", now);
        assert_eq!(cookie.token_at(now + Duration::hours(23)).as_deref(), Some("abc"));
        assert_eq!(cookie.token_at(now + Duration::hours(24)), None);
    }

    #[test]
    fn test_unparseable_value() {
        let mut cookie = AuthCookie::issue("abc");
        cookie.value = "%%% not base64 %%%".to_string();
        assert_eq!(cookie.decode(), None);
    }

    #[test]
    fn test_header_value() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let cookie = AuthCookie::issue_at("abc123", now);
        assert_eq!(
            cookie.to_header_value(),
            "auth=YWJjMTIz; Path=/; SameSite=Strict; Secure; Expires=Mon, 02 Mar 2026 12:00:00 GMT"
        );
        assert!(AuthCookie::expired()
            .to_header_value()
            .ends_with("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_persisted_jar_survives_reopen() {
        let dir = temp_dir("reopen");
        let jar = CookieJar::open(dir.clone());
        jar.set_token("persisted").unwrap();

        let reopened = CookieJar::open(dir.clone());
        assert_eq!(reopened.token().as_deref(), Some("persisted"));

        reopened.clear().unwrap();
        assert_eq!(CookieJar::open(dir.clone()).token(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_write_still_clears_live_token() {
        let dir = temp_dir("unwritable");
        // A directory in the file's place makes every write fail
        std::fs::create_dir_all(dir.join(COOKIE_FILE)).unwrap();
        let jar = CookieJar::open(dir.clone());

        assert!(jar.set_token("xyz").is_err());
        assert_eq!(jar.token().as_deref(), Some("xyz"));

        assert!(jar.clear().is_err());
        assert_eq!(jar.token(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_jar_starts_empty() {
        let dir = temp_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(COOKIE_FILE), "{not json").unwrap();
        assert_eq!(CookieJar::open(dir.clone()).token(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
