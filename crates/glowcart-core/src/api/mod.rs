//! REST API client module for the storefront backend.
//!
//! This module provides the `ApiClient` for talking to the storefront and
//! admin endpoints. Admin routes use bearer token authentication; the token
//! is issued by `/admin/login` and kept in the `auth` cookie.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod retry;

pub use client::{ApiClient, ApiClientBuilder, UnauthorizedHandler, LOGIN_ROUTE};
pub use error::ApiError;
pub use request::{FormData, PostOptions, RequestBody, RequestConfig};
pub use retry::{RetryContext, RetryPolicy};
