//! Local key/value storage for client-side state.
//!
//! `LocalStore` plays the role `localStorage` plays in a browser: the
//! logged-in admin profile, the cart and the wishlist live here between runs.

pub mod local;

pub use local::{LocalStore, CART_KEY, USER_KEY, WISHLIST_KEY};
