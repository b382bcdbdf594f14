pub mod donation;
pub mod notification;

pub use donation::{
    AgeGroup, ApparelDetails, DonationDetails, DonationRecord, DonationValidationError,
    DonationView, FoodDetails, MoneyDetails,
};
pub use notification::Notification;
