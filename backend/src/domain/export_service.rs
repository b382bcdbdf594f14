//! CSV export of donations for administrators.

use anyhow::Result;
use csv::Writer;
use log::info;
use serde::Serialize;

use crate::domain::models::{DonationDetails, DonationView};

/// One CSV line: the master row flattened with whichever sub-row it has
#[derive(Debug, Serialize)]
struct DonationCsvRow<'a> {
    id: &'a str,
    user_id: &'a str,
    #[serde(rename = "type")]
    donation_type: &'a str,
    status: &'a str,
    created_at: String,
    rice_qty: Option<i64>,
    veg_qty: Option<i64>,
    target_age: Option<u32>,
    transaction_id: Option<&'a str>,
    money_status: Option<&'a str>,
}

impl<'a> From<&'a DonationView> for DonationCsvRow<'a> {
    fn from(view: &'a DonationView) -> Self {
        let donation = &view.donation;
        let mut row = DonationCsvRow {
            id: &donation.id,
            user_id: &donation.user_id,
            donation_type: donation.donation_type.as_str(),
            status: donation.status().as_str(),
            created_at: donation.created_at.to_rfc3339(),
            rice_qty: None,
            veg_qty: None,
            target_age: None,
            transaction_id: None,
            money_status: None,
        };

        match &view.details {
            Some(DonationDetails::Food(food)) => {
                row.rice_qty = Some(food.rice_qty);
                row.veg_qty = Some(food.veg_qty);
            }
            Some(DonationDetails::Apparel(apparel)) => {
                row.target_age = Some(apparel.target_age.value());
            }
            Some(DonationDetails::Money(money)) => {
                row.transaction_id = Some(&money.transaction_id);
                row.money_status = Some(if money.status { "confirmed" } else { "captured" });
            }
            None => {}
        }
        row
    }
}

#[derive(Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    pub fn export_donations_csv(&self, views: &[DonationView]) -> Result<String> {
        let mut writer = Writer::from_writer(Vec::new());
        for view in views {
            writer.serialize(DonationCsvRow::from(view))?;
        }
        let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
        let csv = String::from_utf8(bytes)?;

        info!("Exported {} donations as CSV", views.len());
        Ok(csv)
    }
}
