use serde::{Deserialize, Serialize};

/// A message left through the storefront contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactsPayload {
    #[serde(default, alias = "data", alias = "submissions")]
    pub contacts: Vec<ContactSubmission>,
}
