use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::NotificationKind;

use super::donation::generate_row_id;

/// A message in a donor's mailbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub donation_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn generate_id(now_millis: i64) -> String {
        generate_row_id("notification", now_millis)
    }
}
