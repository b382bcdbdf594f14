//! The master table and its three sub-tables, handled together.
//!
//! Services that need to join, verify or cascade across the normalized
//! schema go through `DonationTables` instead of juggling four repositories.

use anyhow::Result;
use log::{info, warn};
use shared::DonationType;

use crate::domain::commands::review::DeleteDonationResult;
use crate::domain::models::{
    ApparelDetails, DonationDetails, DonationRecord, DonationView, FoodDetails, MoneyDetails,
};
use crate::storage::{DonationRepository, StoreConnection, SubRecord, SubRecordRepository};

#[derive(Clone)]
pub struct DonationTables {
    pub donations: DonationRepository,
    pub food: SubRecordRepository<FoodDetails>,
    pub apparel: SubRecordRepository<ApparelDetails>,
    pub money: SubRecordRepository<MoneyDetails>,
}

impl DonationTables {
    pub fn new(connection: &StoreConnection) -> Self {
        Self {
            donations: connection.create_donation_repository(),
            food: connection.create_food_repository(),
            apparel: connection.create_apparel_repository(),
            money: connection.create_money_repository(),
        }
    }

    /// Join a master row with the sub-row of its own type
    pub fn join(&self, donation: DonationRecord) -> Result<DonationView> {
        let details = match donation.donation_type {
            DonationType::Food => self
                .food
                .find_by_donation(&donation.id)?
                .map(DonationDetails::Food),
            DonationType::Apparel => self
                .apparel
                .find_by_donation(&donation.id)?
                .map(DonationDetails::Apparel),
            DonationType::Money => self
                .money
                .find_by_donation(&donation.id)?
                .map(DonationDetails::Money),
        };
        Ok(DonationView { donation, details })
    }

    /// Commit verification: read both rows back after a write.
    /// `accept` gets a final say on the sub-row (e.g. that a status flip
    /// persisted). Read failures count as a failed verification.
    pub fn verify_commit<T, F>(
        &self,
        donation_id: &str,
        sub_table: &SubRecordRepository<T>,
        accept: F,
    ) -> bool
    where
        T: SubRecord,
        F: Fn(&T) -> bool,
    {
        let master = match self.donations.get_donation(donation_id) {
            Ok(master) => master,
            Err(e) => {
                warn!("Commit verification could not read donation {}: {}", donation_id, e);
                return false;
            }
        };
        let sub_row = match sub_table.find_by_donation(donation_id) {
            Ok(sub_row) => sub_row,
            Err(e) => {
                warn!(
                    "Commit verification could not read {} for donation {}: {}",
                    T::TABLE,
                    donation_id,
                    e
                );
                return false;
            }
        };

        match (master, sub_row) {
            (Some(master), Some(sub_row)) => {
                master.donation_type == T::DONATION_TYPE && accept(&sub_row)
            }
            (master, sub_row) => {
                warn!(
                    "Commit verification failed for donation {}: master present={}, {} row present={}",
                    donation_id,
                    master.is_some(),
                    T::TABLE,
                    sub_row.is_some()
                );
                false
            }
        }
    }

    /// Delete a master row and every sub-row referencing it. Unmatched
    /// deletes are no-ops.
    pub fn cascade_delete(&self, donation_id: &str) -> Result<DeleteDonationResult> {
        let result = DeleteDonationResult {
            master_removed: self.donations.delete_donation(donation_id)?,
            food_removed: self.food.remove_by_donation(donation_id)?,
            apparel_removed: self.apparel.remove_by_donation(donation_id)?,
            money_removed: self.money.remove_by_donation(donation_id)?,
        };

        if result.is_noop() {
            info!("Delete of donation {} matched nothing", donation_id);
        } else {
            info!("Deleted donation {}: {:?}", donation_id, result);
        }
        Ok(result)
    }
}
