use serde::{Deserialize, Serialize};

use crate::models::{OrderItem, Product};
use crate::utils::round_money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub shade: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Stock known when the item was added; caps the quantity.
    #[serde(default)]
    pub stock: Option<u32>,
}

impl CartItem {
    pub fn from_product(product: &Product, shade: Option<String>, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.effective_price(),
            quantity,
            shade,
            image: product.thumbnail().map(str::to_string),
            stock: product.stock,
        }
    }

    /// Lines for the same product in the same shade merge.
    pub fn same_line(&self, other: &CartItem) -> bool {
        self.product_id == other.product_id && self.shade == other.shade
    }

    pub fn line_total(&self) -> f64 {
        round_money(self.price * self.quantity as f64)
    }

    fn capped(&self, quantity: u32) -> u32 {
        match self.stock {
            Some(stock) => quantity.min(stock),
            None => quantity,
        }
    }

    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            shade: self.shade.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, merging with an existing line for the same product and
    /// shade. Quantities are capped by known stock; a line that ends up at
    /// zero is not kept.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.same_line(&item)) {
            // Latest price and stock win
            existing.price = item.price;
            if item.stock.is_some() {
                existing.stock = item.stock;
            }
            existing.quantity = existing.capped(existing.quantity.saturating_add(item.quantity));
        } else {
            let quantity = item.capped(item.quantity);
            self.items.push(CartItem { quantity, ..item });
        }
        self.items.retain(|i| i.quantity > 0);
    }

    /// Set a line's quantity; zero removes it. Returns false if no such line.
    pub fn set_quantity(&mut self, product_id: &str, shade: Option<&str>, quantity: u32) -> bool {
        let Some(index) = self.position(product_id, shade) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(index);
        } else {
            let item = &mut self.items[index];
            item.quantity = item.capped(quantity);
        }
        true
    }

    pub fn remove(&mut self, product_id: &str, shade: Option<&str>) -> Option<CartItem> {
        let index = self.position(product_id, shade)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Fold another cart into this one using the same merge rule as `add`.
    pub fn merge(&mut self, other: Cart) {
        for item in other.items {
            self.add(item);
        }
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        round_money(self.items.iter().map(CartItem::line_total).sum())
    }

    pub fn order_items(&self) -> Vec<OrderItem> {
        self.items.iter().map(CartItem::to_order_item).collect()
    }

    fn position(&self, product_id: &str, shade: Option<&str>) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.product_id == product_id && i.shade.as_deref() == shade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, shade: Option<&str>, price: f64, quantity: u32) -> CartItem {
        CartItem {
            product_id: id.to_string(),
            name: format!("Product {}", id),
            price,
            quantity,
            shade: shade.map(str::to_string),
            image: None,
            stock: None,
        }
    }

    #[test]
    fn test_add_merges_same_line() {
        let mut cart = Cart::new();
        cart.add(item("p-1", None, 4500.0, 1));
        cart.add(item("p-1", None, 4500.0, 2));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_shades_are_separate_lines() {
        let mut cart = Cart::new();
        cart.add(item("p-1", Some("Light"), 4500.0, 1));
        cart.add(item("p-1", Some("Deep"), 4500.0, 1));
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn test_stock_caps_quantity() {
        let mut cart = Cart::new();
        let mut limited = item("p-2", None, 1000.0, 5);
        limited.stock = Some(3);
        cart.add(limited.clone());
        assert_eq!(cart.item_count(), 3);
        cart.add(limited);
        assert_eq!(cart.item_count(), 3);

        assert!(cart.set_quantity("p-2", None, 10));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_out_of_stock_not_added() {
        let mut cart = Cart::new();
        let mut sold_out = item("p-3", None, 1000.0, 1);
        sold_out.stock = Some(0);
        cart.add(sold_out);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(item("p-1", None, 4500.0, 2));
        assert!(cart.set_quantity("p-1", None, 0));
        assert!(cart.is_empty());
        assert!(!cart.set_quantity("p-1", None, 1));
    }

    #[test]
    fn test_merge_and_subtotal() {
        let mut cart = Cart::new();
        cart.add(item("p-1", None, 4500.0, 1));

        let mut saved = Cart::new();
        saved.add(item("p-1", None, 4500.0, 1));
        saved.add(item("p-2", None, 1250.5, 2));

        cart.merge(saved);
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), 11501.0);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(item("p-1", Some("Light"), 4500.0, 1));
        assert!(cart.remove("p-1", None).is_none());
        assert_eq!(cart.remove("p-1", Some("Light")).map(|i| i.quantity), Some(1));
    }
}
