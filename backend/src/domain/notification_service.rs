use anyhow::Result;
use chrono::Utc;
use log::info;
use shared::NotificationKind;

use crate::domain::commands::notification::NotifyCommand;
use crate::domain::models::{DonationRecord, Notification};
use crate::storage::{NotificationRepository, StoreConnection};

/// Donor mailbox: review outcomes and anything else worth telling a donor
#[derive(Clone)]
pub struct NotificationService {
    notification_repository: NotificationRepository,
}

impl NotificationService {
    pub fn new(connection: &StoreConnection) -> Self {
        Self {
            notification_repository: connection.create_notification_repository(),
        }
    }

    /// Append an unread notification
    pub fn notify(&self, command: NotifyCommand) -> Result<Notification> {
        let now = Utc::now();
        let notification = Notification {
            id: Notification::generate_id(now.timestamp_millis()),
            user_id: command.user_id,
            donation_id: command.donation_id,
            kind: command.kind,
            message: command.message,
            reason: command.reason,
            created_at: now,
            read: false,
        };

        self.notification_repository.store_notification(&notification)?;
        info!(
            "Notified user {} about donation {} ({})",
            notification.user_id, notification.donation_id, notification.kind
        );
        Ok(notification)
    }

    /// Tell the donor how their donation was reviewed. Pending donations
    /// produce nothing.
    pub fn notify_review_outcome(&self, donation: &DonationRecord) -> Result<Option<Notification>> {
        let (kind, message, reason) = match donation.approved {
            None => return Ok(None),
            Some(true) => (
                NotificationKind::Approved,
                format!("Your {} donation has been approved. Thank you!", donation.donation_type),
                None,
            ),
            Some(false) => (
                NotificationKind::Rejected,
                format!("Your {} donation was not accepted.", donation.donation_type),
                donation.rejection_reason.clone(),
            ),
        };

        self.notify(NotifyCommand {
            user_id: donation.user_id.clone(),
            donation_id: donation.id.clone(),
            kind,
            message,
            reason,
        })
        .map(Some)
    }

    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.notification_repository.list_for_user(user_id)
    }

    pub fn count_unread(&self, user_id: &str) -> Result<usize> {
        Ok(self
            .notification_repository
            .list_for_user(user_id)?
            .iter()
            .filter(|n| !n.read)
            .count())
    }

    /// Returns false if the id is unknown
    pub fn mark_read(&self, notification_id: &str) -> Result<bool> {
        self.notification_repository.mark_read(notification_id)
    }

    pub fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let changed = self.notification_repository.mark_all_read(user_id)?;
        info!("Marked {} notifications read for user {}", changed, user_id);
        Ok(changed)
    }
}
