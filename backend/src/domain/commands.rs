//! Domain-level command and result types.
//! These structs are the inputs and outputs of the services in this module.
//! A UI layer maps its own form state onto them.

pub mod donation {
    use crate::domain::models::{DonationRecord, MoneyDetails};

    /// Input for a food donation. Quantities arrive as entered and are parsed
    /// as integers by the service.
    #[derive(Debug, Clone)]
    pub struct CreateFoodDonationCommand {
        pub user_id: String,
        pub rice: String,
        pub vegetables: String,
    }

    /// Input for an apparel donation
    #[derive(Debug, Clone)]
    pub struct CreateApparelDonationCommand {
        pub user_id: String,
        pub age_group: u32,
    }

    /// Input for a money donation captured from a scanned QR code
    #[derive(Debug, Clone)]
    pub struct CreateMoneyDonationCommand {
        pub user_id: String,
        pub qr_payload: String,
    }

    /// Result of a completed donation write.
    #[derive(Debug, Clone)]
    pub struct CreateDonationResult {
        pub donation: DonationRecord,
        /// True when commit verification found both rows. When false the
        /// donor is not thanked and no success event was announced.
        pub acknowledged: bool,
    }

    /// Result of capturing a money donation that still awaits confirmation
    #[derive(Debug, Clone)]
    pub struct PendingMoneyDonation {
        pub donation: DonationRecord,
        pub details: MoneyDetails,
    }

    impl PendingMoneyDonation {
        pub fn transaction_id(&self) -> &str {
            &self.details.transaction_id
        }
    }
}

pub mod review {
    /// Field-level correction of a food sub-row. `None` leaves a field as is.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateFoodCommand {
        pub rice_qty: Option<i64>,
        pub veg_qty: Option<i64>,
    }

    /// Field-level correction of a money sub-row
    #[derive(Debug, Clone, Default)]
    pub struct UpdateMoneyCommand {
        pub transaction_id: Option<String>,
        pub qr_payload: Option<String>,
        pub status: Option<bool>,
    }

    /// What a cascading delete removed
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct DeleteDonationResult {
        pub master_removed: bool,
        pub food_removed: usize,
        pub apparel_removed: usize,
        pub money_removed: usize,
    }

    impl DeleteDonationResult {
        /// True when nothing matched, as on a repeated delete
        pub fn is_noop(&self) -> bool {
            !self.master_removed
                && self.food_removed == 0
                && self.apparel_removed == 0
                && self.money_removed == 0
        }
    }
}

pub mod notification {
    use shared::NotificationKind;

    #[derive(Debug, Clone)]
    pub struct NotifyCommand {
        pub user_id: String,
        pub donation_id: String,
        pub kind: NotificationKind,
        pub message: String,
        pub reason: Option<String>,
    }
}
