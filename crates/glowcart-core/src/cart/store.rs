use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use super::{Cart, Wishlist};
use crate::storage::{LocalStore, CART_KEY, WISHLIST_KEY};

/// Keeps the cart and wishlist in the local store between runs.
pub struct CartStore {
    store: Arc<LocalStore>,
}

impl CartStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    /// Saved cart, or an empty one if nothing usable is stored.
    pub fn load_cart(&self) -> Cart {
        self.load_or_default(CART_KEY)
    }

    pub fn save_cart(&self, cart: &Cart) -> Result<()> {
        self.store.save(CART_KEY, cart)
    }

    pub fn load_wishlist(&self) -> Wishlist {
        self.load_or_default(WISHLIST_KEY)
    }

    pub fn save_wishlist(&self, wishlist: &Wishlist) -> Result<()> {
        self.store.save(WISHLIST_KEY, wishlist)
    }

    /// Merge the saved cart into `cart`, then persist the result.
    pub fn restore_into(&self, cart: &mut Cart) -> Result<()> {
        cart.merge(self.load_cart());
        self.save_cart(cart)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove_item(CART_KEY)?;
        self.store.remove_item(WISHLIST_KEY)?;
        Ok(())
    }

    fn load_or_default<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key = key, error = %e, "Discarding unreadable saved state");
                T::default()
            }
        }
    }
}
