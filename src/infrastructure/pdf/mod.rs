pub mod receipt;

use crate::domain::country_profile::CountryProfile;
use crate::domain::error::Result;
use crate::domain::paystub::PaystubRecord;

pub use receipt::ReceiptRenderer;

/// Turns a validated paystub into the bytes of a PDF receipt
pub trait PaystubRenderer {
    fn render(
        &self,
        record: &PaystubRecord,
        profile: CountryProfile,
        company: &str,
    ) -> Result<Vec<u8>>;
}
