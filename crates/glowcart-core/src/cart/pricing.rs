use serde::{Deserialize, Serialize};

use super::Cart;
use crate::models::{DeliveryDiscount, DeliveryFee};
use crate::utils::round_money;

/// What the customer pays, as shown at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub subtotal: f64,
    pub delivery_fee: f64,
    /// Amount taken off the delivery fee.
    pub discount: f64,
    pub total: f64,
}

/// The discount with the highest threshold the subtotal reaches.
pub fn best_discount(subtotal: f64, discounts: &[DeliveryDiscount]) -> Option<&DeliveryDiscount> {
    discounts
        .iter()
        .filter(|d| d.applies_to(subtotal))
        .max_by(|a, b| a.min_order_amount.total_cmp(&b.min_order_amount))
}

/// Price a cart for delivery. Without a fee (unknown location, pickup) the
/// delivery charge is zero and no discount applies.
pub fn quote(cart: &Cart, fee: Option<&DeliveryFee>, discounts: &[DeliveryDiscount]) -> CheckoutQuote {
    let subtotal = cart.subtotal();
    let delivery_fee = fee.map(|f| round_money(f.fee.max(0.0))).unwrap_or(0.0);

    let discount = if cart.is_empty() {
        0.0
    } else {
        best_discount(subtotal, discounts)
            .map(|d| {
                let percentage = d.percentage.clamp(0.0, 100.0);
                round_money(delivery_fee * percentage / 100.0).min(delivery_fee)
            })
            .unwrap_or(0.0)
    };

    CheckoutQuote {
        subtotal,
        delivery_fee,
        discount,
        total: round_money(subtotal + delivery_fee - discount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;

    fn cart_worth(amount: f64) -> Cart {
        let mut cart = Cart::new();
        cart.add(CartItem {
            product_id: "p-1".to_string(),
            name: "Glow Serum".to_string(),
            price: amount,
            quantity: 1,
            shade: None,
            image: None,
            stock: None,
        });
        cart
    }

    fn fee(amount: f64) -> DeliveryFee {
        DeliveryFee {
            id: "f-1".to_string(),
            location: "Lagos".to_string(),
            fee: amount,
        }
    }

    fn discount(min: f64, percentage: f64) -> DeliveryDiscount {
        DeliveryDiscount {
            id: format!("d-{}", min),
            min_order_amount: min,
            percentage,
            active: true,
        }
    }

    #[test]
    fn test_quote_without_discount() {
        let q = quote(&cart_worth(10000.0), Some(&fee(2500.0)), &[]);
        assert_eq!(q, CheckoutQuote { subtotal: 10000.0, delivery_fee: 2500.0, discount: 0.0, total: 12500.0 });
    }

    #[test]
    fn test_highest_reached_threshold_wins() {
        let discounts = vec![discount(20000.0, 50.0), discount(50000.0, 100.0), discount(100000.0, 100.0)];
        let q = quote(&cart_worth(60000.0), Some(&fee(3000.0)), &discounts);
        assert_eq!(q.discount, 3000.0);
        assert_eq!(q.total, 60000.0);

        let q = quote(&cart_worth(25000.0), Some(&fee(3000.0)), &discounts);
        assert_eq!(q.discount, 1500.0);
        assert_eq!(q.total, 26500.0);
    }

    #[test]
    fn test_discount_never_exceeds_fee() {
        let q = quote(&cart_worth(60000.0), Some(&fee(3000.0)), &[discount(0.0, 150.0)]);
        assert_eq!(q.discount, 3000.0);
        assert_eq!(q.total, 60000.0);
    }

    #[test]
    fn test_no_fee_no_discount() {
        let q = quote(&cart_worth(60000.0), None, &[discount(0.0, 50.0)]);
        assert_eq!(q.delivery_fee, 0.0);
        assert_eq!(q.discount, 0.0);
        assert_eq!(q.total, 60000.0);
    }

    #[test]
    fn test_empty_cart() {
        let q = quote(&Cart::new(), Some(&fee(2500.0)), &[discount(0.0, 100.0)]);
        assert_eq!(q.discount, 0.0);
        assert_eq!(q.total, 2500.0);
    }
}
