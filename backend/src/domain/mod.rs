//! # Domain Module
//!
//! Business logic of the donation tracker: donor submissions, administrator
//! review, the donor mailbox and inventory totals. Works against the storage
//! layer only through `StoreConnection` and its repositories.
//!
//! ## Module Organization
//!
//! - **donation_service**: donor writes (food, apparel, two-step money) and reads
//! - **review_service**: administrator approve/reject/delete/update, CSV export
//! - **notification_service**: donor mailbox
//! - **inventory_service**: totals over approved donations
//! - **donation_tables**: joins, commit verification and cascading deletes
//!   across the master table and its sub-tables
//! - **notifier**: success event hook and the one-shot thanks flag
//! - **authorization**: administrator session check
//!
//! ## Business Rules
//!
//! - A sub-row always references a master row of its own type; a master has
//!   at most one such sub-row
//! - Review state is pending, approved or rejected; any state can move to any
//!   other and the audit trail of the previous decision is cleared
//! - Apparel age groups are limited to 10, 19, 20, 30 and 45
//! - Deletes cascade and are idempotent

pub mod authorization;
pub mod commands;
pub mod donation_service;
pub mod donation_tables;
pub mod export_service;
pub mod inventory_service;
pub mod models;
pub mod notification_service;
pub mod notifier;
pub mod review_service;

pub use authorization::{require_admin, AuthorizationError};
pub use commands::*;
pub use donation_service::DonationService;
pub use donation_tables::DonationTables;
pub use export_service::ExportService;
pub use inventory_service::InventoryService;
pub use notification_service::NotificationService;
pub use notifier::{DonationNotifier, NoopNotifier, ThanksFlag};
pub use review_service::ReviewService;
