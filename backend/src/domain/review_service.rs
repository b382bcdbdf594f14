//! Administrative review of donations.
//!
//! Every operation takes the caller's session explicitly and checks the
//! administrator role before touching storage, so a refused call never
//! leaves a partial mutation behind.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use shared::Session;

use crate::domain::authorization::require_admin;
use crate::domain::commands::review::{DeleteDonationResult, UpdateFoodCommand, UpdateMoneyCommand};
use crate::domain::donation_tables::DonationTables;
use crate::domain::export_service::ExportService;
use crate::domain::models::{
    AgeGroup, ApparelDetails, DonationRecord, DonationView, FoodDetails, MoneyDetails,
};
use crate::storage::StoreConnection;

#[derive(Clone)]
pub struct ReviewService {
    tables: DonationTables,
    export_service: ExportService,
}

impl ReviewService {
    pub fn new(connection: &StoreConnection) -> Self {
        Self {
            tables: DonationTables::new(connection),
            export_service: ExportService::new(),
        }
    }

    /// Every donation of every user, in insertion order
    pub fn list_all(&self, session: Option<&Session>) -> Result<Vec<DonationRecord>> {
        require_admin(session)?;
        self.tables.donations.list_donations()
    }

    /// Donations still awaiting a decision
    pub fn list_pending(&self, session: Option<&Session>) -> Result<Vec<DonationRecord>> {
        require_admin(session)?;
        Ok(self
            .tables
            .donations
            .list_donations()?
            .into_iter()
            .filter(|d| d.approved.is_none())
            .collect())
    }

    /// Every donation joined with its sub-row
    pub fn list_all_views(&self, session: Option<&Session>) -> Result<Vec<DonationView>> {
        require_admin(session)?;
        self.tables
            .donations
            .list_donations()?
            .into_iter()
            .map(|d| self.tables.join(d))
            .collect()
    }

    pub fn approve(
        &self,
        session: Option<&Session>,
        donation_id: &str,
    ) -> Result<Option<DonationRecord>> {
        let admin = require_admin(session)?;
        info!("Approving donation {} by {}", donation_id, admin.user_id);

        let now = Utc::now();
        let updated = self
            .tables
            .donations
            .update_donation(donation_id, |d| d.mark_approved(&admin.user_id, now))?;

        if updated.is_none() {
            warn!("Cannot approve unknown donation: {}", donation_id);
        }
        Ok(updated)
    }

    /// Reject with a reason. The reason is trimmed; an empty reason is stored
    /// as is.
    pub fn reject(
        &self,
        session: Option<&Session>,
        donation_id: &str,
        reason: &str,
    ) -> Result<Option<DonationRecord>> {
        let admin = require_admin(session)?;
        info!("Rejecting donation {} by {}", donation_id, admin.user_id);

        let now = Utc::now();
        let updated = self
            .tables
            .donations
            .update_donation(donation_id, |d| d.mark_rejected(&admin.user_id, now, reason))?;

        if updated.is_none() {
            warn!("Cannot reject unknown donation: {}", donation_id);
        }
        Ok(updated)
    }

    /// Delete a donation and cascade across every sub-table
    pub fn delete_donation(
        &self,
        session: Option<&Session>,
        donation_id: &str,
    ) -> Result<DeleteDonationResult> {
        let admin = require_admin(session)?;
        info!("Deleting donation {} by {}", donation_id, admin.user_id);
        self.tables.cascade_delete(donation_id)
    }

    pub fn update_food(
        &self,
        session: Option<&Session>,
        donation_id: &str,
        command: UpdateFoodCommand,
    ) -> Result<Option<FoodDetails>> {
        require_admin(session)?;
        info!("Updating food details for donation {}: {:?}", donation_id, command);

        self.tables.food.update_by_donation(donation_id, |food| {
            if let Some(rice_qty) = command.rice_qty {
                food.rice_qty = rice_qty;
            }
            if let Some(veg_qty) = command.veg_qty {
                food.veg_qty = veg_qty;
            }
        })
    }

    /// Change the target age group; the new value is validated like on creation
    pub fn update_apparel(
        &self,
        session: Option<&Session>,
        donation_id: &str,
        age_group: u32,
    ) -> Result<Option<ApparelDetails>> {
        require_admin(session)?;
        let target_age = AgeGroup::new(age_group)?;
        info!("Updating apparel details for donation {}: age {}", donation_id, age_group);

        self.tables
            .apparel
            .update_by_donation(donation_id, |apparel| apparel.target_age = target_age)
    }

    pub fn update_money(
        &self,
        session: Option<&Session>,
        donation_id: &str,
        command: UpdateMoneyCommand,
    ) -> Result<Option<MoneyDetails>> {
        require_admin(session)?;
        info!("Updating money details for donation {}", donation_id);

        self.tables.money.update_by_donation(donation_id, |money| {
            if let Some(transaction_id) = command.transaction_id {
                money.transaction_id = transaction_id;
            }
            if let Some(qr_payload) = command.qr_payload {
                money.qr_payload = qr_payload;
            }
            if let Some(status) = command.status {
                money.status = status;
            }
        })
    }

    /// CSV of every donation joined with its details
    pub fn export_csv(&self, session: Option<&Session>) -> Result<String> {
        let views = self.list_all_views(session)?;
        self.export_service.export_donations_csv(&views)
    }
}
