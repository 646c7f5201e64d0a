//! API client for the storefront backend.
//!
//! Every call funnels through [`ApiClient::request`], which deduplicates
//! identical in-flight requests, attaches the bearer token to admin routes,
//! retries transient failures with linear backoff, picks up rotated tokens,
//! and turns a 401 into a forced logout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{CookieJar, TokenStore};
use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use crate::storage::{LocalStore, USER_KEY};

use super::request::{FormData, PostOptions, RequestBody, RequestConfig};
use super::retry::{RetryContext, RetryPolicy};
use super::ApiError;

/// Route the unauthorized handler is sent to after a 401.
pub const LOGIN_ROUTE: &str = "/login";

/// Called with [`LOGIN_ROUTE`] after a 401 has cleared the stored credentials.
pub type UnauthorizedHandler = Arc<dyn Fn(&str) + Send + Sync>;

type PendingResponse = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

/// Removes its key from the in-flight registry when dropped.
struct PendingEntry {
    registry: Arc<DashMap<String, PendingResponse>>,
    key: String,
}

impl Drop for PendingEntry {
    fn drop(&mut self) {
        self.registry.remove(&self.key);
    }
}

/// API client for the storefront backend.
/// Clone is cheap - clones share the connection pool, token store and the
/// in-flight request registry.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    policy: RetryPolicy,
    tokens: Arc<dyn TokenStore>,
    store: Arc<LocalStore>,
    pending: Arc<DashMap<String, PendingResponse>>,
    on_unauthorized: UnauthorizedHandler,
}

impl ApiClient {
    /// Start building a new API client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Client with default settings, in-memory token and local stores.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Local store shared with this client (holds the `user` profile).
    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// Number of distinct requests currently in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    // ===== Token handling =====

    /// Bearer token from the auth cookie, if present and readable.
    pub fn token(&self) -> Option<String> {
        self.tokens.token()
    }

    /// Overwrite the stored token, resetting its 24 hour expiry.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.tokens.set_token(token)
    }

    /// Expire the auth cookie and drop the stored `user` profile.
    /// Both removals are attempted; the first failure is returned.
    pub fn clear_auth(&self) -> Result<()> {
        let cleared = self.tokens.clear();
        let removed = self.store.remove_item(USER_KEY);
        cleared.and(removed)
    }

    fn handle_unauthorized(&self) {
        warn!("Unauthorized response, clearing session");
        if let Err(e) = self.clear_auth() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        (self.on_unauthorized)(LOGIN_ROUTE);
    }

    // ===== Requests =====

    /// Issue a request, sharing the pending result with any identical
    /// request already in flight.
    pub async fn request(&self, config: RequestConfig) -> Result<Value, ApiError> {
        let key = config.dedup_key();

        let pending = match self.pending.entry(key.clone()) {
            Entry::Occupied(entry) => {
                debug!(key = %key, "Joining in-flight request");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let client = self.clone();
                let registry = Arc::clone(&self.pending);
                // Runs to completion even if every caller stops waiting
                let task = tokio::spawn(async move {
                    // Settled either way, panics included; the next identical call runs fresh
                    let _entry = PendingEntry { registry, key };
                    client.execute(config).await
                });
                let future = async move {
                    task.await.unwrap_or_else(|e| {
                        Err(ApiError::Request(format!("Request task failed: {}", e)))
                    })
                }
                .boxed()
                .shared();
                entry.insert(future.clone());
                future
            }
        };

        pending.await
    }

    /// Run one logical request through the retry loop.
    async fn execute(&self, config: RequestConfig) -> Result<Value, ApiError> {
        let mut ctx = RetryContext::default();

        loop {
            let err = match self.attempt(&config, &ctx).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if matches!(err, ApiError::Unauthorized { .. }) {
                self.handle_unauthorized();
                return Err(err);
            }

            match ctx.next(&self.policy, &err) {
                Some((next, delay)) => {
                    warn!(
                        method = %config.method,
                        url = %config.url,
                        retry = next.retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    ctx = next;
                }
                None => {
                    debug!(
                        method = %config.method,
                        url = %config.url,
                        attempts = ctx.attempt(),
                        error = %err,
                        "Request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// A single attempt: build, send, read, and check the response.
    async fn attempt(&self, config: &RequestConfig, ctx: &RetryContext) -> Result<Value, ApiError> {
        let token = if config.requires_auth() {
            self.tokens.token()
        } else {
            None
        };

        let builder = config.build(&self.client, &self.base_url, token.as_deref())?;
        debug!(attempt = ctx.attempt(), method = %config.method, url = %config.url, "Sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        if !status.is_success() {
            debug!(
                url = %config.url,
                %status,
                body = %ApiError::truncate_body(&body),
                "Error response"
            );
            return Err(ApiError::from_status(status, &body));
        }

        let value: Value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| {
                ApiError::InvalidResponse(format!("{} from {}", e, config.url))
            })?
        };

        if let Some(token) = value.get("token").and_then(Value::as_str) {
            debug!(url = %config.url, "Response carried a token, rotating");
            if let Err(e) = self.tokens.set_token(token) {
                warn!(error = %e, "Failed to store rotated token");
            }
        }

        Ok(value)
    }

    fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("{} from {}", e, url)))
    }

    // ===== Convenience methods =====

    /// GET with `params` serialized into the query string.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<Value>,
    ) -> Result<T, ApiError> {
        let config = RequestConfig::new(Method::GET, url).with_params(params);
        let value = self.request(config).await?;
        Self::decode(url, value)
    }

    /// POST a JSON body, with optional extra headers and query params.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        data: &B,
        options: PostOptions,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(data).map_err(|e| ApiError::Request(e.to_string()))?;
        let config = RequestConfig::new(Method::POST, url)
            .with_body(RequestBody::Json(body))
            .with_headers(options.headers)
            .with_params(options.params);
        let value = self.request(config).await?;
        Self::decode(url, value)
    }

    /// POST `multipart/form-data`, for product image uploads.
    pub async fn post_form_data<T: DeserializeOwned>(
        &self,
        url: &str,
        form: FormData,
    ) -> Result<T, ApiError> {
        let config = RequestConfig::new(Method::POST, url).with_body(RequestBody::Multipart(form));
        let value = self.request(config).await?;
        Self::decode(url, value)
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    policy: RetryPolicy,
    user_agent: Option<String>,
    tokens: Option<Arc<dyn TokenStore>>,
    store: Option<Arc<LocalStore>>,
    on_unauthorized: Option<UnauthorizedHandler>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            policy: RetryPolicy::default(),
            user_agent: None,
            tokens: None,
            store: None,
            on_unauthorized: None,
        }
    }
}

impl ApiClientBuilder {
    /// Take base URL, timeout and retry policy from a loaded [`Config`].
    pub fn config(self, config: &Config) -> Self {
        self.base_url(config.base_url())
            .timeout(config.timeout())
            .retry_policy(config.retry_policy())
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn local_store(mut self, store: Arc<LocalStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn on_unauthorized<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let mut builder = Client::builder().timeout(self.timeout);
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build()?;

        let tokens: Arc<dyn TokenStore> = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(CookieJar::in_memory()),
        };
        let on_unauthorized: UnauthorizedHandler = match self.on_unauthorized {
            Some(handler) => handler,
            None => Arc::new(|route: &str| info!(route = route, "Session ended, login required")),
        };

        Ok(ApiClient {
            client,
            base_url: Arc::from(self.base_url),
            policy: self.policy,
            tokens,
            store: self.store.unwrap_or_else(|| Arc::new(LocalStore::in_memory())),
            pending: Arc::new(DashMap::new()),
            on_unauthorized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_base_url() {
        let client = ApiClient::builder()
            .base_url("https://shop.glowcart.test/api/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://shop.glowcart.test/api");
    }

    #[test]
    fn test_builder_takes_config() {
        let config = Config {
            max_retries: 1,
            retry_delay_ms: 250,
            ..Config::default()
        };
        let client = ApiClient::builder().config(&config).build().unwrap();
        assert_eq!(client.policy(), RetryPolicy::new(1, Duration::from_millis(250)));
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_clear_auth_removes_token_and_user() {
        let client = ApiClient::new().unwrap();
        client.set_token("xyz").unwrap();
        client.store().set_item(USER_KEY, r#"{"email":"a@b.c"}"#).unwrap();

        client.clear_auth().unwrap();
        assert_eq!(client.token(), None);
        assert_eq!(client.store().get_item(USER_KEY).unwrap(), None);
    }

    struct LockedKeychain;

    impl TokenStore for LockedKeychain {
        fn token(&self) -> Option<String> {
            Some("stale".to_string())
        }

        fn set_token(&self, _token: &str) -> Result<()> {
            Err(anyhow::anyhow!("keychain locked"))
        }

        fn clear(&self) -> Result<()> {
            Err(anyhow::anyhow!("keychain locked"))
        }
    }

    #[test]
    fn test_clear_auth_removes_user_when_token_store_fails() {
        let client = ApiClient::builder()
            .token_store(Arc::new(LockedKeychain))
            .build()
            .unwrap();
        client.store().set_item(USER_KEY, "{}").unwrap();

        let err = client.clear_auth().unwrap_err();
        assert_eq!(err.to_string(), "keychain locked");
        assert_eq!(client.store().get_item(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_clones_share_token_store() {
        let client = ApiClient::new().unwrap();
        let clone = client.clone();
        client.set_token("shared").unwrap();
        assert_eq!(clone.token().as_deref(), Some("shared"));
    }
}
