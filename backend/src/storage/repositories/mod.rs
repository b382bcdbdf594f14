//! Per-table repositories used by the domain services.

pub mod donation_repository;
pub mod notification_repository;
pub mod sub_record_repository;

pub use donation_repository::DonationRepository;
pub use notification_repository::NotificationRepository;
pub use sub_record_repository::{SubRecord, SubRecordRepository};
