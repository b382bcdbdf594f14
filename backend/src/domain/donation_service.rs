//! Donor-facing donation operations.
//!
//! Food and apparel donations are written in one call: a pending master row
//! plus its sub-row, followed by commit verification. Money donations take
//! two steps: `create_pending_money_donation` captures the scan with
//! `status=false`, then `complete_money_donation` confirms it or
//! `cancel_pending_money_donation` erases both rows.
//!
//! Every path that ends a donation applies the same policy: the thanks flag
//! is raised and the success event announced only when commit verification
//! finds both rows.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use shared::DonationType;
use std::sync::Arc;

use crate::domain::commands::donation::{
    CreateApparelDonationCommand, CreateDonationResult, CreateFoodDonationCommand,
    CreateMoneyDonationCommand, PendingMoneyDonation,
};
use crate::domain::donation_tables::DonationTables;
use crate::domain::models::{
    AgeGroup, ApparelDetails, DonationRecord, DonationValidationError, DonationView, FoodDetails,
    MoneyDetails,
};
use crate::domain::notifier::{DonationNotifier, NoopNotifier, ThanksFlag};
use crate::storage::StoreConnection;

#[derive(Clone)]
pub struct DonationService {
    tables: DonationTables,
    notifier: Arc<dyn DonationNotifier>,
    thanks_flag: Option<ThanksFlag>,
}

impl DonationService {
    pub fn new(connection: &StoreConnection) -> Self {
        Self {
            tables: DonationTables::new(connection),
            notifier: Arc::new(NoopNotifier),
            thanks_flag: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn DonationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_thanks_flag(mut self, thanks_flag: ThanksFlag) -> Self {
        self.thanks_flag = Some(thanks_flag);
        self
    }

    /// Create a food donation. Quantities are parsed as integers; range
    /// checks are the caller's job.
    pub fn create_food_donation(
        &self,
        command: CreateFoodDonationCommand,
    ) -> Result<CreateDonationResult> {
        info!(
            "Creating food donation: user={}, rice={}, vegetables={}",
            command.user_id, command.rice, command.vegetables
        );

        let rice_qty = parse_quantity("rice", &command.rice)?;
        let veg_qty = parse_quantity("vegetables", &command.vegetables)?;

        let now = Utc::now();
        let donation = DonationRecord::new_pending(&command.user_id, DonationType::Food, now);
        let details = FoodDetails::new(&donation.id, rice_qty, veg_qty, now.timestamp_millis());

        self.tables
            .donations
            .store_donation(&donation)
            .context("Failed to store food donation")?;
        if let Err(e) = self.tables.food.store(&details) {
            warn!("Failed to store food details for donation {}: {}", donation.id, e);
        }

        let committed = self
            .tables
            .verify_commit(&donation.id, &self.tables.food, |_| true);
        let acknowledged = self.finish_donation(&donation, committed);

        Ok(CreateDonationResult {
            donation,
            acknowledged,
        })
    }

    /// Create an apparel donation. An age group outside the allowed set
    /// fails before anything is written.
    pub fn create_apparel_donation(
        &self,
        command: CreateApparelDonationCommand,
    ) -> Result<CreateDonationResult> {
        info!(
            "Creating apparel donation: user={}, age_group={}",
            command.user_id, command.age_group
        );

        let target_age = AgeGroup::new(command.age_group)?;

        let now = Utc::now();
        let donation = DonationRecord::new_pending(&command.user_id, DonationType::Apparel, now);
        let details = ApparelDetails::new(&donation.id, target_age, now.timestamp_millis());

        self.tables
            .donations
            .store_donation(&donation)
            .context("Failed to store apparel donation")?;
        if let Err(e) = self.tables.apparel.store(&details) {
            warn!("Failed to store apparel details for donation {}: {}", donation.id, e);
        }

        let committed = self
            .tables
            .verify_commit(&donation.id, &self.tables.apparel, |_| true);
        let acknowledged = self.finish_donation(&donation, committed);

        Ok(CreateDonationResult {
            donation,
            acknowledged,
        })
    }

    /// Capture a scanned money donation without confirming it
    pub fn create_pending_money_donation(
        &self,
        command: CreateMoneyDonationCommand,
    ) -> Result<PendingMoneyDonation> {
        info!("Capturing money donation for user: {}", command.user_id);

        let now = Utc::now();
        let donation = DonationRecord::new_pending(&command.user_id, DonationType::Money, now);
        let details = MoneyDetails::new_pending(&donation.id, &command.qr_payload, now.timestamp_millis());

        self.tables
            .donations
            .store_donation(&donation)
            .context("Failed to store money donation")?;
        if let Err(e) = self.tables.money.store(&details) {
            warn!("Failed to store money details for donation {}: {}", donation.id, e);
        }

        info!(
            "Captured money donation {} with transaction {}",
            donation.id, details.transaction_id
        );
        Ok(PendingMoneyDonation { donation, details })
    }

    /// Confirm a captured money donation. `None` when the id is unknown or
    /// has no money row; nothing is written in that case.
    pub fn complete_money_donation(&self, donation_id: &str) -> Result<Option<CreateDonationResult>> {
        info!("Completing money donation: {}", donation_id);

        let Some(donation) = self.tables.donations.get_donation(donation_id)? else {
            warn!("Money donation not found: {}", donation_id);
            return Ok(None);
        };

        if self
            .tables
            .money
            .update_by_donation(donation_id, |m| m.status = true)?
            .is_none()
        {
            warn!("No money details for donation: {}", donation_id);
            return Ok(None);
        }

        let committed = self
            .tables
            .verify_commit(donation_id, &self.tables.money, |m| m.status);
        let acknowledged = self.finish_donation(&donation, committed);

        Ok(Some(CreateDonationResult {
            donation,
            acknowledged,
        }))
    }

    /// Erase a captured money donation the donor abandoned. Unknown ids and
    /// donations of another type are a no-op. Returns true if anything was
    /// removed.
    pub fn cancel_pending_money_donation(&self, donation_id: &str) -> Result<bool> {
        info!("Cancelling money donation: {}", donation_id);

        if let Some(donation) = self.tables.donations.get_donation(donation_id)? {
            if donation.donation_type != DonationType::Money {
                warn!(
                    "Refusing to cancel {} donation {} as a money donation",
                    donation.donation_type, donation_id
                );
                return Ok(false);
            }
        }

        let master_removed = self.tables.donations.delete_donation(donation_id)?;
        let money_removed = self.tables.money.remove_by_donation(donation_id)?;

        Ok(master_removed || money_removed > 0)
    }

    /// Capture and confirm a money donation in one call
    pub fn create_and_complete_money_donation(
        &self,
        command: CreateMoneyDonationCommand,
    ) -> Result<CreateDonationResult> {
        let pending = self.create_pending_money_donation(command)?;

        match self.complete_money_donation(&pending.donation.id)? {
            Some(result) => Ok(result),
            None => Ok(CreateDonationResult {
                donation: pending.donation,
                acknowledged: false,
            }),
        }
    }

    /// Donations owned by one donor, in insertion order
    pub fn list_by_user(&self, user_id: &str) -> Result<Vec<DonationRecord>> {
        self.tables.donations.list_donations_for_user(user_id)
    }

    pub fn get_by_id(&self, donation_id: &str) -> Result<Option<DonationRecord>> {
        self.tables.donations.get_donation(donation_id)
    }

    pub fn get_food_details(&self, donation_id: &str) -> Result<Option<FoodDetails>> {
        self.tables.food.find_by_donation(donation_id)
    }

    pub fn get_apparel_details(&self, donation_id: &str) -> Result<Option<ApparelDetails>> {
        self.tables.apparel.find_by_donation(donation_id)
    }

    pub fn get_money_details(&self, donation_id: &str) -> Result<Option<MoneyDetails>> {
        self.tables.money.find_by_donation(donation_id)
    }

    /// Master row joined with its sub-row
    pub fn get_donation_view(&self, donation_id: &str) -> Result<Option<DonationView>> {
        match self.tables.donations.get_donation(donation_id)? {
            Some(donation) => Ok(Some(self.tables.join(donation)?)),
            None => Ok(None),
        }
    }

    /// Raise the thanks flag and announce success if the write was verified.
    /// Returns whether the donation was acknowledged.
    fn finish_donation(&self, donation: &DonationRecord, committed: bool) -> bool {
        if !committed {
            warn!(
                "Donation {} was not verified; skipping acknowledgement",
                donation.id
            );
            return false;
        }

        if let Some(flag) = &self.thanks_flag {
            if let Err(e) = flag.raise(donation) {
                warn!("Failed to raise thanks flag for {}: {}", donation.id, e);
            }
        }
        self.notifier.donation_succeeded(donation);

        info!("Donation {} recorded", donation.id);
        true
    }
}

fn parse_quantity(field: &'static str, value: &str) -> Result<i64, DonationValidationError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| DonationValidationError::InvalidQuantity {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{admin, TestHelper};
    use shared::DonationStatus;

    fn food(user_id: &str, rice: &str, vegetables: &str) -> CreateFoodDonationCommand {
        CreateFoodDonationCommand {
            user_id: user_id.to_string(),
            rice: rice.to_string(),
            vegetables: vegetables.to_string(),
        }
    }

    fn money(user_id: &str) -> CreateMoneyDonationCommand {
        CreateMoneyDonationCommand {
            user_id: user_id.to_string(),
            qr_payload: "upi://pay?pa=shelter@bank&am=500".to_string(),
        }
    }

    #[test]
    fn test_create_food_donation_writes_linked_rows() {
        let helper = TestHelper::new();
        let service = &helper.donation_service;

        let result = service.create_food_donation(food("alice", "5", " 3 ")).unwrap();
        assert!(result.acknowledged);
        assert_eq!(result.donation.donation_type, DonationType::Food);
        assert_eq!(result.donation.status(), DonationStatus::Pending);

        let masters = helper.tables.donations.list_donations().unwrap();
        let food_rows = helper.tables.food.list().unwrap();
        assert_eq!(masters.len(), 1);
        assert_eq!(food_rows.len(), 1);
        assert_eq!(food_rows[0].donation_id, masters[0].id);
        assert_eq!((food_rows[0].rice_qty, food_rows[0].veg_qty), (5, 3));

        assert_eq!(service.get_by_id(&result.donation.id).unwrap(), Some(result.donation.clone()));
        assert!(service.get_food_details(&result.donation.id).unwrap().is_some());
    }

    #[test]
    fn test_create_food_donation_accepts_negative_but_not_text() {
        let helper = TestHelper::new();
        let service = &helper.donation_service;

        let result = service.create_food_donation(food("alice", "-2", "0")).unwrap();
        let details = service.get_food_details(&result.donation.id).unwrap().unwrap();
        assert_eq!(details.rice_qty, -2);

        let err = service.create_food_donation(food("alice", "lots", "1")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DonationValidationError>(),
            Some(DonationValidationError::InvalidQuantity { field: "rice", .. })
        ));
        assert_eq!(helper.tables.donations.list_donations().unwrap().len(), 1);
    }

    #[test]
    fn test_create_food_donation_announces_success() {
        let helper = TestHelper::new();
        let result = helper
            .donation_service
            .create_food_donation(food("alice", "1", "1"))
            .unwrap();

        assert_eq!(helper.notifier.events(), vec![result.donation.clone()]);
        assert_eq!(helper.thanks_flag.take().unwrap(), Some(result.donation.id));
    }

    #[test]
    fn test_apparel_donation_rejects_unknown_age_before_writing() {
        let helper = TestHelper::new();

        for age in [0, 9, 18, 21, 46, 100] {
            let err = helper
                .donation_service
                .create_apparel_donation(CreateApparelDonationCommand {
                    user_id: "alice".to_string(),
                    age_group: age,
                })
                .unwrap_err();
            assert_eq!(
                err.downcast_ref::<DonationValidationError>(),
                Some(&DonationValidationError::InvalidAgeGroup(age))
            );
        }

        assert!(helper.tables.donations.list_donations().unwrap().is_empty());
        assert!(helper.tables.apparel.list().unwrap().is_empty());
        assert!(helper.notifier.events().is_empty());
    }

    #[test]
    fn test_apparel_donation_with_valid_age() {
        let helper = TestHelper::new();
        let result = helper
            .donation_service
            .create_apparel_donation(CreateApparelDonationCommand {
                user_id: "bob".to_string(),
                age_group: 30,
            })
            .unwrap();

        assert!(result.acknowledged);
        let details = helper
            .donation_service
            .get_apparel_details(&result.donation.id)
            .unwrap()
            .unwrap();
        assert_eq!(details.target_age.value(), 30);
    }

    #[test]
    fn test_failed_sub_row_write_returns_record_without_acknowledgement() {
        let helper = TestHelper::new();
        helper.store.fail_writes_to("donation_food");

        let result = helper
            .donation_service
            .create_food_donation(food("alice", "4", "2"))
            .unwrap();

        assert!(!result.acknowledged);
        assert!(helper.notifier.events().is_empty());
        assert_eq!(helper.thanks_flag.take().unwrap(), None);
        // The master row was written; the partial write is left for an admin to clean up
        assert!(helper.donation_service.get_by_id(&result.donation.id).unwrap().is_some());
        assert!(helper.donation_service.get_food_details(&result.donation.id).unwrap().is_none());
    }

    #[test]
    fn test_failed_master_write_is_an_error() {
        let helper = TestHelper::new();
        helper.store.fail_writes_to("donations");

        assert!(helper
            .donation_service
            .create_food_donation(food("alice", "4", "2"))
            .is_err());
        assert!(helper.tables.food.list().unwrap().is_empty());
    }

    #[test]
    fn test_thanks_flag_failure_does_not_fail_donation() {
        let helper = TestHelper::new();
        helper.store.fail_writes_to("donation_thanks");

        let result = helper
            .donation_service
            .create_food_donation(food("alice", "4", "2"))
            .unwrap();

        assert!(result.acknowledged);
        assert_eq!(helper.notifier.events().len(), 1);
        assert_eq!(helper.thanks_flag.take().unwrap(), None);
    }

    #[test]
    fn test_pending_money_then_cancel_restores_tables() {
        let helper = TestHelper::new();
        let service = &helper.donation_service;
        service.create_pending_money_donation(money("carol")).unwrap();

        let masters_before = helper.tables.donations.list_donations().unwrap();
        let money_before = helper.tables.money.list().unwrap();

        let pending = service.create_pending_money_donation(money("alice")).unwrap();
        assert!(pending.transaction_id().starts_with("TXN-"));
        assert!(!pending.details.status);
        assert!(helper.notifier.events().is_empty());

        assert!(service.cancel_pending_money_donation(&pending.donation.id).unwrap());
        assert!(!service.cancel_pending_money_donation(&pending.donation.id).unwrap());

        assert_eq!(helper.tables.donations.list_donations().unwrap(), masters_before);
        assert_eq!(helper.tables.money.list().unwrap(), money_before);
    }

    #[test]
    fn test_cancel_leaves_other_donation_types_alone() {
        let helper = TestHelper::new();
        let service = &helper.donation_service;
        let donation = service
            .create_food_donation(food("alice", "4", "2"))
            .unwrap()
            .donation;
        helper
            .review_service
            .approve(Some(&admin()), &donation.id)
            .unwrap();

        assert!(!service.cancel_pending_money_donation(&donation.id).unwrap());

        assert!(service.get_by_id(&donation.id).unwrap().unwrap().is_approved());
        assert!(service.get_food_details(&donation.id).unwrap().is_some());
    }

    #[test]
    fn test_complete_unknown_money_donation_is_noop() {
        let helper = TestHelper::new();
        let pending = helper
            .donation_service
            .create_pending_money_donation(money("alice"))
            .unwrap();
        let money_before = helper.tables.money.list().unwrap();

        assert!(helper
            .donation_service
            .complete_money_donation("donation::missing")
            .unwrap()
            .is_none());

        assert_eq!(helper.tables.money.list().unwrap(), money_before);
        assert!(!helper
            .donation_service
            .get_money_details(&pending.donation.id)
            .unwrap()
            .unwrap()
            .status);
        assert!(helper.notifier.events().is_empty());
    }

    #[test]
    fn test_complete_non_money_donation_is_noop() {
        let helper = TestHelper::new();
        let result = helper
            .donation_service
            .create_food_donation(food("alice", "1", "1"))
            .unwrap();

        assert!(helper
            .donation_service
            .complete_money_donation(&result.donation.id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_complete_money_donation_confirms_and_announces() {
        let helper = TestHelper::new();
        let service = &helper.donation_service;
        let pending = service.create_pending_money_donation(money("alice")).unwrap();

        let result = service
            .complete_money_donation(&pending.donation.id)
            .unwrap()
            .unwrap();

        assert!(result.acknowledged);
        assert!(service.get_money_details(&pending.donation.id).unwrap().unwrap().status);
        assert_eq!(helper.notifier.events(), vec![pending.donation.clone()]);
        assert_eq!(helper.thanks_flag.take().unwrap(), Some(pending.donation.id));
    }

    #[test]
    fn test_complete_money_donation_write_failure_is_error() {
        let helper = TestHelper::new();
        let pending = helper
            .donation_service
            .create_pending_money_donation(money("alice"))
            .unwrap();
        helper.store.fail_writes_to("donation_money");

        assert!(helper
            .donation_service
            .complete_money_donation(&pending.donation.id)
            .is_err());
        assert!(helper.notifier.events().is_empty());
    }

    #[test]
    fn test_complete_money_donation_unpersisted_status_is_unacknowledged() {
        let helper = TestHelper::new();
        let pending = helper
            .donation_service
            .create_pending_money_donation(money("alice"))
            .unwrap();
        helper.store.drop_writes_to("donation_money");

        let result = helper
            .donation_service
            .complete_money_donation(&pending.donation.id)
            .unwrap()
            .unwrap();

        assert!(!result.acknowledged);
        assert!(!helper
            .donation_service
            .get_money_details(&pending.donation.id)
            .unwrap()
            .unwrap()
            .status);
        assert!(helper.notifier.events().is_empty());
        assert_eq!(helper.thanks_flag.take().unwrap(), None);
    }

    #[test]
    fn test_create_and_complete_money_donation() {
        let helper = TestHelper::new();
        let result = helper
            .donation_service
            .create_and_complete_money_donation(money("alice"))
            .unwrap();

        assert!(result.acknowledged);
        let view = helper
            .donation_service
            .get_donation_view(&result.donation.id)
            .unwrap()
            .unwrap();
        assert!(matches!(
            view.details,
            Some(crate::domain::models::DonationDetails::Money(ref m)) if m.status
        ));
    }

    #[test]
    fn test_create_and_complete_without_money_row_is_unacknowledged() {
        let helper = TestHelper::new();
        helper.store.fail_writes_to("donation_money");

        let result = helper
            .donation_service
            .create_and_complete_money_donation(money("alice"))
            .unwrap();

        assert!(!result.acknowledged);
        assert!(helper.notifier.events().is_empty());
    }

    #[test]
    fn test_list_by_user_only_returns_own_records() {
        let helper = TestHelper::new();
        let service = &helper.donation_service;
        let a1 = service.create_food_donation(food("alice", "1", "1")).unwrap().donation;
        service.create_food_donation(food("bob", "2", "2")).unwrap();
        let a2 = service.create_pending_money_donation(money("alice")).unwrap().donation;

        let alice = service.list_by_user("alice").unwrap();
        assert_eq!(alice, vec![a1, a2]);
        assert!(alice.iter().all(|d| d.user_id == "alice"));
        assert!(service.list_by_user("nobody").unwrap().is_empty());
    }
}
