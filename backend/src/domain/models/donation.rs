use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{DonationStatus, DonationType};
use uuid::Uuid;

/// Short random suffix used to keep ids unique within one millisecond
fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Generate a row id of the form `<prefix>::<epoch_millis>::<8 hex>`.
/// Ids sort by creation time for rows created in different milliseconds.
pub fn generate_row_id(prefix: &str, now_millis: i64) -> String {
    format!("{}::{:013}::{}", prefix, now_millis, random_suffix())
}

/// Master row: the fields every donation has, whatever its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub donation_type: DonationType,
    pub created_at: DateTime<Utc>,
    /// `None` = pending, `Some(true)` = approved, `Some(false)` = rejected
    pub approved: Option<bool>,
    pub donation_status: DonationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl DonationRecord {
    pub fn generate_id(now_millis: i64) -> String {
        generate_row_id("donation", now_millis)
    }

    /// A fresh master row awaiting review
    pub fn new_pending(user_id: &str, donation_type: DonationType, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(now.timestamp_millis()),
            user_id: user_id.to_string(),
            donation_type,
            created_at: now,
            approved: None,
            donation_status: DonationStatus::Pending,
            approved_at: None,
            approved_by: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
        }
    }

    pub fn status(&self) -> DonationStatus {
        DonationStatus::from_approved(self.approved)
    }

    pub fn is_approved(&self) -> bool {
        self.approved == Some(true)
    }

    /// Approve, replacing any earlier rejection audit trail
    pub fn mark_approved(&mut self, approved_by: &str, at: DateTime<Utc>) {
        self.approved = Some(true);
        self.donation_status = DonationStatus::Approved;
        self.approved_at = Some(at);
        self.approved_by = Some(approved_by.to_string());
        self.rejected_at = None;
        self.rejected_by = None;
        self.rejection_reason = None;
    }

    /// Reject, replacing any earlier approval audit trail
    pub fn mark_rejected(&mut self, rejected_by: &str, at: DateTime<Utc>, reason: &str) {
        self.approved = Some(false);
        self.donation_status = DonationStatus::Rejected;
        self.rejected_at = Some(at);
        self.rejected_by = Some(rejected_by.to_string());
        self.rejection_reason = Some(reason.trim().to_string());
        self.approved_at = None;
        self.approved_by = None;
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DonationValidationError {
    #[error("Age group {0} is out of range; expected one of 10, 19, 20, 30, 45")]
    InvalidAgeGroup(u32),
    #[error("{field} quantity '{value}' is not an integer")]
    InvalidQuantity { field: &'static str, value: String },
}

/// Target age group for apparel. Only the values in `AgeGroup::ALLOWED` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AgeGroup(u32);

impl AgeGroup {
    pub const ALLOWED: [u32; 5] = [10, 19, 20, 30, 45];

    pub fn new(value: u32) -> Result<Self, DonationValidationError> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(DonationValidationError::InvalidAgeGroup(value))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for AgeGroup {
    type Error = DonationValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgeGroup> for u32 {
    fn from(age_group: AgeGroup) -> Self {
        age_group.0
    }
}

/// Food sub-row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetails {
    pub id: String,
    pub donation_id: String,
    pub rice_qty: i64,
    pub veg_qty: i64,
}

impl FoodDetails {
    pub fn new(donation_id: &str, rice_qty: i64, veg_qty: i64, now_millis: i64) -> Self {
        Self {
            id: generate_row_id("food", now_millis),
            donation_id: donation_id.to_string(),
            rice_qty,
            veg_qty,
        }
    }
}

/// Apparel sub-row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApparelDetails {
    pub id: String,
    pub donation_id: String,
    pub target_age: AgeGroup,
}

impl ApparelDetails {
    pub fn new(donation_id: &str, target_age: AgeGroup, now_millis: i64) -> Self {
        Self {
            id: generate_row_id("apparel", now_millis),
            donation_id: donation_id.to_string(),
            target_age,
        }
    }
}

/// Money sub-row. `status` is false while captured and true once confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyDetails {
    pub id: String,
    pub donation_id: String,
    pub transaction_id: String,
    pub qr_payload: String,
    pub status: bool,
}

impl MoneyDetails {
    pub fn new_pending(donation_id: &str, qr_payload: &str, now_millis: i64) -> Self {
        Self {
            id: generate_row_id("money", now_millis),
            donation_id: donation_id.to_string(),
            transaction_id: Self::generate_transaction_id(now_millis),
            qr_payload: qr_payload.to_string(),
            status: false,
        }
    }

    pub fn generate_transaction_id(now_millis: i64) -> String {
        format!("TXN-{}-{}", now_millis, random_suffix().to_uppercase())
    }
}

/// Type-specific half of a donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DonationDetails {
    Food(FoodDetails),
    Apparel(ApparelDetails),
    Money(MoneyDetails),
}

/// A master row joined with its sub-row, if one exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    pub donation: DonationRecord,
    pub details: Option<DonationDetails>,
}
