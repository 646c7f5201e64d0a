//! Immutable description of one HTTP call.
//!
//! A [`RequestConfig`] is built once per logical request and rebuilt into a
//! fresh `reqwest::RequestBuilder` for every attempt, so retries reissue the
//! exact same call. Multipart bodies are kept as owned parts for the same
//! reason: `reqwest::multipart::Form` cannot be cloned.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use super::ApiError;

/// Path prefix identifying routes that require a bearer token.
const ADMIN_SEGMENT: &str = "/admin/";

/// The one admin route that must never carry a (possibly stale) token.
const ADMIN_LOGIN_SEGMENT: &str = "/admin/login";

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// Owned multipart form, rebuilt into a `reqwest` form on every attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormValue::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormValue::File {
                file_name: file_name.into(),
                mime: mime.into(),
                bytes,
            },
        ));
        self
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in &self.parts {
            form = match value {
                FormValue::Text(text) => form.text(name.clone(), text.clone()),
                FormValue::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)
                        .map_err(|e| ApiError::Request(e.to_string()))?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(FormData),
}

/// Extra options for [`ApiClient::post`](super::ApiClient::post).
#[derive(Debug, Clone, Default)]
pub struct PostOptions {
    pub headers: HeaderMap,
    pub params: Option<Value>,
}

impl PostOptions {
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|e| ApiError::Request(e.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
    pub headers: HeaderMap,
    pub params: Option<Value>,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            params: None,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_params(mut self, params: Option<Value>) -> Self {
        self.params = params;
        self
    }

    /// Key identifying identical in-flight requests: `{method}-{url}-{JSON(params)}`.
    ///
    /// The body is not part of the key.
    pub fn dedup_key(&self) -> String {
        let params = self
            .params
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "null".to_string());
        format!("{}-{}-{}", self.method, self.url, params)
    }

    /// Admin routes carry the bearer token, except the login call itself.
    pub fn requires_auth(&self) -> bool {
        self.url.contains(ADMIN_SEGMENT) && !self.url.contains(ADMIN_LOGIN_SEGMENT)
    }

    /// Build a fresh `reqwest` request for one attempt.
    pub(crate) fn build(
        &self,
        client: &reqwest::Client,
        base_url: &str,
        token: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let mut builder = client
            .request(self.method.clone(), format!("{}{}", base_url, self.url))
            .headers(self.headers.clone());

        if let Some(ref params) = self.params {
            builder = builder.query(params);
        }

        if let Some(token) = token.filter(|_| self.requires_auth()) {
            builder = builder.bearer_auth(token);
        }

        builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };

        Ok(builder)
    }
}
