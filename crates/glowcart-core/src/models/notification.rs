use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "isRead")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsPayload {
    #[serde(default, alias = "data")]
    pub notifications: Vec<Notification>,
}

impl NotificationsPayload {
    pub fn unread(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unread_count() {
        let payload: NotificationsPayload = serde_json::from_value(json!({
            "code": 200,
            "notifications": [
                { "_id": "n-1", "title": "New order", "isRead": false },
                { "_id": "n-2", "title": "Low stock", "read": true }
            ]
        }))
        .unwrap();
        assert_eq!(payload.notifications.len(), 2);
        assert_eq!(payload.unread(), 1);
    }
}
