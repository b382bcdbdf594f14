//! Collaborators told about a donation once its write has been verified.
//!
//! `DonationNotifier` is the hook a UI event layer implements (for example
//! to navigate to a confirmation view). `ThanksFlag` is the one-shot
//! acknowledgement such a view reads and clears.

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::domain::models::DonationRecord;
use crate::storage::KeyValueStore;

/// Receives the "donation succeeded" event
pub trait DonationNotifier: Send + Sync {
    fn donation_succeeded(&self, donation: &DonationRecord);
}

/// Notifier that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl DonationNotifier for NoopNotifier {
    fn donation_succeeded(&self, _donation: &DonationRecord) {}
}

/// One-shot acknowledgement flag kept in the key-value store. Raised after a
/// verified donation, cleared by the first `take`.
#[derive(Clone)]
pub struct ThanksFlag {
    store: Arc<dyn KeyValueStore>,
}

impl ThanksFlag {
    pub const KEY: &'static str = "donation_thanks";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record that `donation` should be acknowledged
    pub fn raise(&self, donation: &DonationRecord) -> Result<()> {
        self.store.set(Self::KEY, &donation.id)?;
        debug!("Raised thanks flag for donation {}", donation.id);
        Ok(())
    }

    /// Read and clear the flag, returning the donation id it was raised for
    pub fn take(&self) -> Result<Option<String>> {
        let value = self.store.get(Self::KEY)?;
        if value.is_some() {
            self.store.remove(Self::KEY)?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use shared::DonationType;

    #[test]
    fn test_thanks_flag_is_read_once() {
        let flag = ThanksFlag::new(Arc::new(MemoryStore::new()));
        assert_eq!(flag.take().unwrap(), None);

        let donation = DonationRecord::new_pending("alice", DonationType::Food, Utc::now());
        flag.raise(&donation).unwrap();

        assert_eq!(flag.take().unwrap(), Some(donation.id));
        assert_eq!(flag.take().unwrap(), None);
    }
}
