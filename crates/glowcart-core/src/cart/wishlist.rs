use serde::{Deserialize, Serialize};

use super::{Cart, CartItem};
use crate::models::Product;

/// Saved products, in the order they were added, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Wishlist {
    pub products: Vec<Product>,
}

impl Wishlist {
    pub fn contains(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    /// Add the product if absent, remove it if present. Returns whether it
    /// is on the wishlist afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.remove(&product.id).is_some() {
            false
        } else {
            self.products.push(product);
            true
        }
    }

    pub fn remove(&mut self, product_id: &str) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == product_id)?;
        Some(self.products.remove(index))
    }

    /// Move a product into the cart as a single unit.
    pub fn move_to_cart(&mut self, product_id: &str, shade: Option<String>, cart: &mut Cart) -> bool {
        match self.remove(product_id) {
            Some(product) => {
                cart.add(CartItem::from_product(&product, shade, 1));
                true
            }
            None => false,
        }
    }

    /// Fold in another wishlist, keeping the first occurrence of each product.
    pub fn merge(&mut self, other: Wishlist) {
        for product in other.products {
            if !self.contains(&product.id) {
                self.products.push(product);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            price: 2000.0,
            discount_price: None,
            category: None,
            images: vec![],
            shades: vec![],
            stock: None,
        }
    }

    #[test]
    fn test_toggle() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.toggle(product("p-1")));
        assert!(wishlist.contains("p-1"));
        assert!(!wishlist.toggle(product("p-1")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_move_to_cart() {
        let mut wishlist = Wishlist::default();
        wishlist.toggle(product("p-1"));
        let mut cart = Cart::new();

        assert!(wishlist.move_to_cart("p-1", Some("Light".to_string()), &mut cart));
        assert!(wishlist.is_empty());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].shade.as_deref(), Some("Light"));

        assert!(!wishlist.move_to_cart("p-1", None, &mut cart));
    }

    #[test]
    fn test_merge_skips_duplicates() {
        let mut a = Wishlist::default();
        a.toggle(product("p-1"));
        let mut b = Wishlist::default();
        b.toggle(product("p-1"));
        b.toggle(product("p-2"));
        a.merge(b);
        assert_eq!(a.len(), 2);
    }
}
