//! Inventory totals over approved donations.
//!
//! Sub-tables are indexed by donation id once per call, so the aggregate is
//! linear in the size of the tables rather than records × sub-rows.
//! Quantities are not range-checked on entry, so the kilogram totals
//! saturate at the `i64` bounds instead of overflowing.

use anyhow::Result;
use log::info;
use shared::{DonationType, InventorySummary};
use std::collections::HashMap;

use crate::domain::donation_tables::DonationTables;
use crate::storage::StoreConnection;

#[derive(Clone)]
pub struct InventoryService {
    tables: DonationTables,
}

impl InventoryService {
    pub fn new(connection: &StoreConnection) -> Self {
        Self {
            tables: DonationTables::new(connection),
        }
    }

    pub fn approved_inventory(&self) -> Result<InventorySummary> {
        let food: HashMap<String, (i64, i64)> = self
            .tables
            .food
            .list()?
            .into_iter()
            .map(|f| (f.donation_id, (f.rice_qty, f.veg_qty)))
            .collect();
        let apparel: HashMap<String, u32> = self
            .tables
            .apparel
            .list()?
            .into_iter()
            .map(|a| (a.donation_id, a.target_age.value()))
            .collect();

        let mut summary = InventorySummary::default();

        for donation in self.tables.donations.list_donations()? {
            if !donation.is_approved() {
                continue;
            }
            summary.total += 1;

            match donation.donation_type {
                DonationType::Food => {
                    if let Some((rice, veg)) = food.get(&donation.id) {
                        summary.rice_kg = summary.rice_kg.saturating_add(*rice);
                        summary.veg_kg = summary.veg_kg.saturating_add(*veg);
                    }
                }
                DonationType::Apparel => {
                    if let Some(age) = apparel.get(&donation.id) {
                        *summary.clothes.entry(*age).or_insert(0) += 1;
                    }
                }
                DonationType::Money => summary.money_count += 1,
            }
        }

        info!(
            "Inventory: {} approved donations, rice={}kg, veg={}kg, money={}",
            summary.total, summary.rice_kg, summary.veg_kg, summary.money_count
        );
        Ok(summary)
    }
}
