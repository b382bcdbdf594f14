use anyhow::Result;
use std::sync::Arc;

use crate::domain::models::Notification;
use crate::storage::table::Table;
use crate::storage::traits::KeyValueStore;

/// Donor mailbox table
#[derive(Clone)]
pub struct NotificationRepository {
    table: Table<Notification>,
}

impl NotificationRepository {
    pub const TABLE: &'static str = "notifications";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            table: Table::new(store, Self::TABLE),
        }
    }

    pub fn store_notification(&self, notification: &Notification) -> Result<()> {
        self.table.insert(notification.clone())
    }

    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.table.filter(|n| n.user_id == user_id)
    }

    /// Returns false if no notification has this id
    pub fn mark_read(&self, notification_id: &str) -> Result<bool> {
        Ok(self
            .table
            .update_first(|n| n.id == notification_id, |n| n.read = true)?
            .is_some())
    }

    /// Mark every unread notification of a user as read, returning how many changed
    pub fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let mut notifications = self.table.load()?;
        let mut changed = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            changed += 1;
        }
        if changed > 0 {
            self.table.replace(&notifications)?;
        }
        Ok(changed)
    }
}
