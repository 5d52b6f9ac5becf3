use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    ValidationError(String),
    ParseError(String),
    ConfigError(String),
    RenderError(String),
    DeliveryError(String),
    SecurityError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::RenderError(msg) => write!(f, "Render error: {}", msg),
            AppError::DeliveryError(msg) => write!(f, "Delivery error: {}", msg),
            AppError::SecurityError(msg) => write!(f, "Security error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Reason a single payroll row could not be turned into a delivered paystub.
///
/// These never abort a batch; the batch loop turns each one into a failure
/// outcome for its row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowError {
    /// A required field is absent, blank, or not a number.
    MissingOrInvalidField(String),
    InvalidDate,
    InvalidEmail,
    /// Net payment does not match gross payment minus discounts.
    InconsistentNetPayment,
    NegativeNetPayment,
    NegativeDiscount(String),
    /// Rendering or mailing failed; carries the collaborator's description.
    DeliveryFailure(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::MissingOrInvalidField(field) => {
                write!(f, "Missing or invalid field: {}", field)
            }
            RowError::InvalidDate => write!(f, "Invalid date in field: period"),
            RowError::InvalidEmail => write!(f, "Invalid email address"),
            RowError::InconsistentNetPayment => {
                write!(f, "Net payment does not match gross payment minus discounts")
            }
            RowError::NegativeNetPayment => write!(f, "Net payment cannot be negative"),
            RowError::NegativeDiscount(field) => {
                write!(f, "Discount cannot be negative: {}", field)
            }
            RowError::DeliveryFailure(cause) => write!(f, "Delivery failed: {}", cause),
        }
    }
}

impl std::error::Error for RowError {}

impl From<AppError> for RowError {
    fn from(err: AppError) -> Self {
        RowError::DeliveryFailure(err.to_string())
    }
}
