use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A skincare or makeup consultation request from the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    /// Preferred time slot as shown to the customer, e.g. "10:00 AM".
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concern: Option<String>,
}

impl ConsultationBooking {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if !self.email.contains('@') {
            missing.push("email");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.time.trim().is_empty() {
            missing.push("time");
        }
        missing
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationPayload {
    #[serde(default, alias = "bookingId")]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
