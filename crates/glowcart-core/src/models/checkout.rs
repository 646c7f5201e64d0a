use serde::{Deserialize, Serialize};

use super::{Customer, OrderItem};
use crate::cart::CheckoutQuote;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub total: f64,
}

impl CheckoutRequest {
    pub fn new(customer: Customer, items: Vec<OrderItem>, quote: &CheckoutQuote) -> Self {
        Self {
            customer,
            items,
            subtotal: quote.subtotal,
            delivery_fee: quote.delivery_fee,
            discount: quote.discount,
            total: quote.total,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    #[serde(default, alias = "authorizationUrl")]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}
