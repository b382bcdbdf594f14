use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of donation a master record describes. Each kind has its own sub-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationType {
    Food,
    Apparel,
    Money,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationType::Food => "food",
            DonationType::Apparel => "apparel",
            DonationType::Money => "money",
        }
    }

    /// Parse a donation type from its lowercase name
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "food" => Ok(DonationType::Food),
            "apparel" => Ok(DonationType::Apparel),
            "money" => Ok(DonationType::Money),
            other => Err(format!("Unknown donation type: {}", other)),
        }
    }
}

impl fmt::Display for DonationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Textual review status of a donation, mirroring the `approved` tri-state
/// (`None` = pending, `Some(true)` = approved, `Some(false)` = rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl DonationStatus {
    pub fn from_approved(approved: Option<bool>) -> Self {
        match approved {
            None => DonationStatus::Pending,
            Some(true) => DonationStatus::Approved,
            Some(false) => DonationStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Approved => "approved",
            DonationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome a donor is told about. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Approved,
    Rejected,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Approved => f.write_str("approved"),
            NotificationKind::Rejected => f.write_str("rejected"),
        }
    }
}

/// Role carried by a signed-in session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Admin,
}

/// An authenticated session, handed explicitly to every administrative call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

impl Session {
    pub fn donor(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Donor,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Totals over every approved donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub rice_kg: i64,
    pub veg_kg: i64,
    /// Apparel donation count keyed by target age group
    pub clothes: BTreeMap<u32, u32>,
    pub money_count: u32,
    /// Number of approved donations of any type
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mirrors_approved_flag() {
        assert_eq!(DonationStatus::from_approved(None), DonationStatus::Pending);
        assert_eq!(DonationStatus::from_approved(Some(true)), DonationStatus::Approved);
        assert_eq!(DonationStatus::from_approved(Some(false)), DonationStatus::Rejected);
    }

    #[test]
    fn test_donation_type_names() {
        assert_eq!(DonationType::from_string("apparel"), Ok(DonationType::Apparel));
        assert!(DonationType::from_string("books").is_err());
        assert_eq!(
            serde_json::to_string(&DonationType::Money).unwrap(),
            "\"money\""
        );
    }

    #[test]
    fn test_inventory_summary_uses_camel_case() {
        let mut summary = InventorySummary {
            rice_kg: 5,
            veg_kg: 3,
            ..Default::default()
        };
        summary.clothes.insert(20, 1);
        summary.total = 2;

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "riceKg": 5,
                "vegKg": 3,
                "clothes": { "20": 1 },
                "moneyCount": 0,
                "total": 2
            })
        );
    }

    #[test]
    fn test_session_roles() {
        assert!(Session::admin("root").is_admin());
        assert!(!Session::donor("alice").is_admin());
    }
}
