use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::PaystubMailer;
use crate::domain::country_profile::CountryProfile;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::SmtpSettings;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// STARTTLS relay; the connection is opened lazily on the first send
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let from = parse_mailbox(&settings.from_email)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| AppError::ConfigError(format!("Invalid SMTP relay '{}': {}", settings.host, e)))?
            .port(settings.port)
            .timeout(Some(settings.timeout));

        if !settings.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| AppError::DeliveryError(format!("Invalid address '{}': {}", address, e)))
}

/// Plain-text body from the profile plus the PDF attachment
pub fn build_message(
    from: &Mailbox,
    profile: CountryProfile,
    to: &str,
    attachment: &[u8],
    filename: &str,
) -> Result<Message> {
    let bundle = profile.bundle();
    let pdf = ContentType::parse("application/pdf")
        .map_err(|e| AppError::Internal(format!("Invalid content type: {}", e)))?;

    Message::builder()
        .from(from.clone())
        .to(parse_mailbox(to)?)
        .subject(bundle.email_subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(bundle.email_body.to_string()))
                .singlepart(Attachment::new(filename.to_string()).body(attachment.to_vec(), pdf)),
        )
        .map_err(|e| AppError::DeliveryError(format!("Failed to build email: {}", e)))
}

#[async_trait]
impl PaystubMailer for SmtpMailer {
    async fn send(
        &self,
        profile: CountryProfile,
        to: &str,
        attachment: &[u8],
        filename: &str,
    ) -> Result<()> {
        let message = build_message(&self.from, profile, to, attachment, filename)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::DeliveryError(format!("SMTP send to {} failed: {}", to, e)))?;

        debug!(to = %to, filename = %filename, "Paystub email sent");
        Ok(())
    }
}
