//! Core library for glowcart.
//!
//! The storefront and admin dashboard talk to the backend through
//! [`ApiClient`]: request deduplication, bearer-token attachment for admin
//! routes, retry with linear backoff, and a forced logout on 401. Around it
//! sit the typed endpoint wrappers, the `auth` cookie token store, a local
//! key/value store, and cart/wishlist/delivery pricing.

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod models;
pub mod storage;
pub mod utils;

pub use api::{ApiClient, ApiClientBuilder, ApiError, FormData, PostOptions, RetryPolicy, LOGIN_ROUTE};
pub use auth::{CookieJar, KeyringTokenStore, TokenStore};
pub use cart::{Cart, CartItem, CartStore, CheckoutQuote, Wishlist};
pub use config::Config;
pub use storage::LocalStore;
