//! # Donation Tracker Backend
//!
//! Contains all non-UI logic for the donation tracker.
//!
//! ## Architecture
//!
//! ```text
//! UI layer (forms, admin panel, confirmation view)
//!     ↓
//! Domain layer (donation, review, notification, inventory services)
//!     ↓
//! Storage layer (table repositories over a key-value store)
//! ```
//!
//! The domain never sees the substrate: the same services run over the
//! in-memory store in tests and over the file store in the binary.

pub mod config;
pub mod domain;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use log::info;
use std::sync::Arc;

pub use config::AppConfig;
pub use domain::*;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreConnection};

/// All services wired over one connection
#[derive(Clone)]
pub struct AppState {
    pub donation_service: DonationService,
    pub review_service: ReviewService,
    pub notification_service: NotificationService,
    pub inventory_service: InventoryService,
    pub thanks_flag: ThanksFlag,
}

/// Build the services over `connection`. Success events go to `notifier`;
/// the thanks flag lives in the same store as the tables.
pub fn initialize_backend(
    connection: StoreConnection,
    notifier: Arc<dyn DonationNotifier>,
) -> AppState {
    info!("Setting up domain services");
    let thanks_flag = ThanksFlag::new(connection.store());
    let donation_service = DonationService::new(&connection)
        .with_notifier(notifier)
        .with_thanks_flag(thanks_flag.clone());

    AppState {
        donation_service,
        review_service: ReviewService::new(&connection),
        notification_service: NotificationService::new(&connection),
        inventory_service: InventoryService::new(&connection),
        thanks_flag,
    }
}
