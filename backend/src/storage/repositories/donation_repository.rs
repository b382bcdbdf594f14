use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::domain::models::DonationRecord;
use crate::storage::table::Table;
use crate::storage::traits::KeyValueStore;

/// Master donation table
#[derive(Clone)]
pub struct DonationRepository {
    table: Table<DonationRecord>,
}

impl DonationRepository {
    pub const TABLE: &'static str = "donations";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            table: Table::new(store, Self::TABLE),
        }
    }

    pub fn store_donation(&self, donation: &DonationRecord) -> Result<()> {
        self.table.insert(donation.clone())?;
        debug!("Stored donation {}", donation.id);
        Ok(())
    }

    pub fn get_donation(&self, donation_id: &str) -> Result<Option<DonationRecord>> {
        self.table.find(|d| d.id == donation_id)
    }

    /// Every master row in insertion order
    pub fn list_donations(&self) -> Result<Vec<DonationRecord>> {
        self.table.load()
    }

    pub fn list_donations_for_user(&self, user_id: &str) -> Result<Vec<DonationRecord>> {
        self.table.filter(|d| d.user_id == user_id)
    }

    /// Apply `update` to one master row; `None` if the id is unknown
    pub fn update_donation<F>(&self, donation_id: &str, update: F) -> Result<Option<DonationRecord>>
    where
        F: FnOnce(&mut DonationRecord),
    {
        self.table.update_first(|d| d.id == donation_id, update)
    }

    /// Returns true if a row was removed
    pub fn delete_donation(&self, donation_id: &str) -> Result<bool> {
        Ok(self.table.remove_where(|d| d.id == donation_id)? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use chrono::Utc;
    use shared::DonationType;

    fn repo() -> DonationRepository {
        DonationRepository::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_store_get_and_list_for_user() {
        let repo = repo();
        let alice = DonationRecord::new_pending("alice", DonationType::Food, Utc::now());
        let bob = DonationRecord::new_pending("bob", DonationType::Money, Utc::now());
        repo.store_donation(&alice).unwrap();
        repo.store_donation(&bob).unwrap();

        assert_eq!(repo.get_donation(&bob.id).unwrap(), Some(bob.clone()));
        assert_eq!(repo.list_donations_for_user("alice").unwrap(), vec![alice.clone()]);
        assert_eq!(repo.list_donations().unwrap(), vec![alice, bob]);
    }

    #[test]
    fn test_update_and_delete_unknown_ids() {
        let repo = repo();
        assert_eq!(repo.update_donation("nope", |d| d.approved = Some(true)).unwrap(), None);
        assert!(!repo.delete_donation("nope").unwrap());
    }
}
