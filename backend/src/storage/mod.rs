//! # Storage Module
//!
//! Handles all data persistence for the donation tracker.
//!
//! Persistence is a textual key-value substrate: every logical table lives
//! under one key and its value is the table's entire content as a JSON array.
//! Every write loads the whole table, mutates it in memory and writes the
//! whole table back.
//!
//! ## Layers
//!
//! - **traits**: the `KeyValueStore` port the rest of the crate depends on
//! - **memory** / **file**: substrates implementing the port
//! - **table**: typed whole-table read-modify-write over the port
//! - **repositories**: per-table access used by the domain services
//! - **connection**: a cloneable handle that builds repositories
//!
//! ## Table Keys
//!
//! ```text
//! donations          master rows
//! donation_food      food sub-rows
//! donation_apparel   apparel sub-rows
//! donation_money     money sub-rows
//! notifications      donor mailbox
//! donation_thanks    one-shot acknowledgement flag
//! ```
//!
//! There is no locking discipline across tables. Two writers interleaving on
//! the same table can overwrite each other's snapshot.

pub mod connection;
pub mod file;
pub mod memory;
pub mod repositories;
pub mod table;
pub mod traits;

pub use connection::StoreConnection;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use repositories::{
    DonationRepository, NotificationRepository, SubRecord, SubRecordRepository,
};
pub use table::{StorageError, Table};
pub use traits::KeyValueStore;
