pub mod smtp;

use crate::domain::country_profile::CountryProfile;
use crate::domain::error::Result;
use async_trait::async_trait;

pub use smtp::SmtpMailer;

/// Delivers a rendered paystub to one employee
#[async_trait]
pub trait PaystubMailer {
    async fn send(
        &self,
        profile: CountryProfile,
        to: &str,
        attachment: &[u8],
        filename: &str,
    ) -> Result<()>;
}
