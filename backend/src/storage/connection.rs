use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::domain::models::{ApparelDetails, FoodDetails, MoneyDetails};
use super::file::FileStore;
use super::memory::MemoryStore;
use super::repositories::{DonationRepository, NotificationRepository, SubRecordRepository};
use super::traits::KeyValueStore;

/// Cloneable handle on one key-value substrate. Creates the repositories
/// the domain services work with.
#[derive(Clone)]
pub struct StoreConnection {
    store: Arc<dyn KeyValueStore>,
}

impl StoreConnection {
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A connection over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// A connection over JSON files in `data_directory`
    pub fn open_directory<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        let store = FileStore::new(data_directory.as_ref())?;
        info!("Opened file store at {}", store.base_directory().display());
        Ok(Self::new(store))
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub fn create_donation_repository(&self) -> DonationRepository {
        DonationRepository::new(self.store.clone())
    }

    pub fn create_food_repository(&self) -> SubRecordRepository<FoodDetails> {
        SubRecordRepository::new(self.store.clone())
    }

    pub fn create_apparel_repository(&self) -> SubRecordRepository<ApparelDetails> {
        SubRecordRepository::new(self.store.clone())
    }

    pub fn create_money_repository(&self) -> SubRecordRepository<MoneyDetails> {
        SubRecordRepository::new(self.store.clone())
    }

    pub fn create_notification_repository(&self) -> NotificationRepository {
        NotificationRepository::new(self.store.clone())
    }
}
