//! Cart, wishlist and delivery pricing.
//!
//! Both collections are plain values: callers mutate them and hand them to
//! `CartStore` to persist. Adding an item that is already in the cart (same
//! product and shade) merges into the existing line.

pub mod items;
pub mod pricing;
pub mod store;
pub mod wishlist;

pub use items::{Cart, CartItem};
pub use pricing::{best_discount, quote, CheckoutQuote};
pub use store::CartStore;
pub use wishlist::Wishlist;
