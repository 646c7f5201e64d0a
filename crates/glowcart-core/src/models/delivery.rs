use serde::{Deserialize, Serialize};

/// Delivery fee charged for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFee {
    #[serde(alias = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub location: String,
    pub fee: f64,
}

/// Percentage off the delivery fee once the subtotal reaches a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDiscount {
    #[serde(alias = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub min_order_amount: f64,
    pub percentage: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl DeliveryDiscount {
    pub fn applies_to(&self, subtotal: f64) -> bool {
        self.active && subtotal >= self.min_order_amount
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFeesPayload {
    #[serde(default, alias = "data", alias = "fees")]
    pub delivery_fees: Vec<DeliveryFee>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDiscountsPayload {
    #[serde(default, alias = "data", alias = "discounts")]
    pub delivery_discounts: Vec<DeliveryDiscount>,
}

/// Find the fee for a location, ignoring case and surrounding whitespace.
pub fn fee_for_location<'a>(fees: &'a [DeliveryFee], location: &str) -> Option<&'a DeliveryFee> {
    let wanted = location.trim();
    fees.iter()
        .find(|f| f.location.trim().eq_ignore_ascii_case(wanted))
}
