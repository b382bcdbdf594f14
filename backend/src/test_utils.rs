//! Test utilities shared by the service tests.
//!
//! `TestHelper` wires every service over one fresh in-memory store wrapped in
//! a `FailingStore`, so a test can make writes to chosen tables fail the way
//! a full disk would.
use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use shared::Session;

use crate::domain::models::DonationRecord;
use crate::domain::notifier::{DonationNotifier, ThanksFlag};
use crate::domain::{
    DonationService, DonationTables, InventoryService, NotificationService, ReviewService,
};
use crate::storage::{KeyValueStore, MemoryStore, StoreConnection};

/// Memory store whose writes to selected keys fail, or are dropped
/// without an error
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing_keys: Arc<RwLock<HashSet<String>>>,
    dropped_keys: Arc<RwLock<HashSet<String>>>,
}

impl FailingStore {
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.write().unwrap().insert(key.to_string());
    }

    /// Report success for writes to `key` but keep the old value
    pub fn drop_writes_to(&self, key: &str) {
        self.dropped_keys.write().unwrap().insert(key.to_string());
    }

    fn is_dropped(&self, key: &str) -> bool {
        self.dropped_keys.read().unwrap().contains(key)
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.failing_keys.read().unwrap().contains(key) {
            return Err(anyhow!("Storage quota exceeded while writing '{}'", key));
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        if self.is_dropped(key) {
            return Ok(());
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check(key)?;
        if self.is_dropped(key) {
            return Ok(());
        }
        self.inner.remove(key)
    }
}

/// Notifier that remembers every success event
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<DonationRecord>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<DonationRecord> {
        self.events.lock().unwrap().clone()
    }
}

impl DonationNotifier for RecordingNotifier {
    fn donation_succeeded(&self, donation: &DonationRecord) {
        self.events.lock().unwrap().push(donation.clone());
    }
}

pub struct TestHelper {
    pub store: FailingStore,
    pub tables: DonationTables,
    pub notifier: Arc<RecordingNotifier>,
    pub thanks_flag: ThanksFlag,
    pub donation_service: DonationService,
    pub review_service: ReviewService,
    pub notification_service: NotificationService,
    pub inventory_service: InventoryService,
}

impl TestHelper {
    pub fn new() -> Self {
        let store = FailingStore::default();
        let connection = StoreConnection::new(store.clone());
        let notifier = Arc::new(RecordingNotifier::default());
        let thanks_flag = ThanksFlag::new(connection.store());

        let donation_service = DonationService::new(&connection)
            .with_notifier(notifier.clone())
            .with_thanks_flag(thanks_flag.clone());

        Self {
            tables: DonationTables::new(&connection),
            review_service: ReviewService::new(&connection),
            notification_service: NotificationService::new(&connection),
            inventory_service: InventoryService::new(&connection),
            donation_service,
            thanks_flag,
            notifier,
            store,
        }
    }
}

pub fn admin() -> Session {
    Session::admin("admin::1")
}
