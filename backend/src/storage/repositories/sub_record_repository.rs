//! Repository shared by the three type-specific sub-tables.
//!
//! Sub-rows reference their master through `donationId`. A master has at
//! most one sub-row in the table matching its type.

use anyhow::Result;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::DonationType;
use std::sync::Arc;

use crate::domain::models::{ApparelDetails, FoodDetails, MoneyDetails};
use crate::storage::table::Table;
use crate::storage::traits::KeyValueStore;

/// A row living in one of the type-specific sub-tables
pub trait SubRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Storage key of the sub-table
    const TABLE: &'static str;
    /// Master `type` this sub-table belongs to
    const DONATION_TYPE: DonationType;

    fn donation_id(&self) -> &str;
}

impl SubRecord for FoodDetails {
    const TABLE: &'static str = "donation_food";
    const DONATION_TYPE: DonationType = DonationType::Food;

    fn donation_id(&self) -> &str {
        &self.donation_id
    }
}

impl SubRecord for ApparelDetails {
    const TABLE: &'static str = "donation_apparel";
    const DONATION_TYPE: DonationType = DonationType::Apparel;

    fn donation_id(&self) -> &str {
        &self.donation_id
    }
}

impl SubRecord for MoneyDetails {
    const TABLE: &'static str = "donation_money";
    const DONATION_TYPE: DonationType = DonationType::Money;

    fn donation_id(&self) -> &str {
        &self.donation_id
    }
}

#[derive(Clone)]
pub struct SubRecordRepository<T: SubRecord> {
    table: Table<T>,
}

impl<T: SubRecord> SubRecordRepository<T> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            table: Table::new(store, T::TABLE),
        }
    }

    pub fn store(&self, record: &T) -> Result<()> {
        self.table.insert(record.clone())?;
        debug!("Stored {} row for donation {}", T::TABLE, record.donation_id());
        Ok(())
    }

    pub fn find_by_donation(&self, donation_id: &str) -> Result<Option<T>> {
        self.table.find(|r| r.donation_id() == donation_id)
    }

    pub fn list(&self) -> Result<Vec<T>> {
        self.table.load()
    }

    pub fn update_by_donation<F>(&self, donation_id: &str, update: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        self.table.update_first(|r| r.donation_id() == donation_id, update)
    }

    /// Remove every row referencing `donation_id`. Zero is not an error.
    pub fn remove_by_donation(&self, donation_id: &str) -> Result<usize> {
        self.table.remove_where(|r| r.donation_id() == donation_id)
    }
}
