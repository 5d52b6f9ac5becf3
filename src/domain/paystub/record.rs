// ============================================================
// PAYSTUB RECORD
// ============================================================
// A payroll row that passed every field and cross-field check

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;
use validator::ValidateEmail;

use super::ValidationPolicy;
use crate::domain::csv::RawRow;
use crate::domain::error::RowError;

/// Discount columns; an absent or blank discount counts as zero
pub const DISCOUNT_FIELDS: [&str; 4] = [
    "health_discount_amount",
    "social_discount_amount",
    "taxes_discount_amount",
    "other_discount_amount",
];

const PERIOD_FORMAT: &str = "%Y-%m-%d";

/// Largest decimal exponent accepted in either direction, e.g. `1e18` or `0.01`
const MAX_AMOUNT_SCALE: i64 = 18;

/// Validated paystub for one employee and pay period.
///
/// Only [`PaystubRecord::from_row`] builds one, so holding a record means
/// net payment is non-negative and reconciles with gross payment minus
/// discounts.
#[derive(Debug, Clone, PartialEq)]
pub struct PaystubRecord {
    full_name: String,
    email: String,
    position: String,
    health_discount_amount: BigDecimal,
    social_discount_amount: BigDecimal,
    taxes_discount_amount: BigDecimal,
    other_discount_amount: BigDecimal,
    gross_salary: BigDecimal,
    gross_payment: BigDecimal,
    net_payment: BigDecimal,
    period: NaiveDate,
}

impl PaystubRecord {
    /// Parse and check a raw CSV row.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// text fields, numeric fields, `period`, `email`, the sign of
    /// `net_payment`, then reconciliation.
    pub fn from_row(row: &RawRow, policy: &ValidationPolicy) -> Result<Self, RowError> {
        let full_name = required_text(row, "full_name")?;
        let position = required_text(row, "position")?;

        let health_discount_amount = discount(row, DISCOUNT_FIELDS[0])?;
        let social_discount_amount = discount(row, DISCOUNT_FIELDS[1])?;
        let taxes_discount_amount = discount(row, DISCOUNT_FIELDS[2])?;
        let other_discount_amount = discount(row, DISCOUNT_FIELDS[3])?;
        let gross_salary = required_amount(row, "gross_salary")?;
        let gross_payment = required_amount(row, "gross_payment")?;
        let net_payment = required_amount(row, "net_payment")?;

        let period = row
            .non_blank("period")
            .and_then(|v| NaiveDate::parse_from_str(v, PERIOD_FORMAT).ok())
            .ok_or(RowError::InvalidDate)?;

        let email = row
            .non_blank("email")
            .map(str::to_string)
            .filter(|v| v.validate_email())
            .ok_or(RowError::InvalidEmail)?;

        if net_payment < BigDecimal::from(0) {
            return Err(RowError::NegativeNetPayment);
        }

        let expected_net = &gross_payment
            - &health_discount_amount
            - &social_discount_amount
            - &taxes_discount_amount
            - &other_discount_amount;
        if (expected_net - &net_payment).abs() > policy.reconciliation_tolerance {
            return Err(RowError::InconsistentNetPayment);
        }

        Ok(Self {
            full_name,
            email,
            position,
            health_discount_amount,
            social_discount_amount,
            taxes_discount_amount,
            other_discount_amount,
            gross_salary,
            gross_payment,
            net_payment,
            period,
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn health_discount_amount(&self) -> &BigDecimal {
        &self.health_discount_amount
    }

    pub fn social_discount_amount(&self) -> &BigDecimal {
        &self.social_discount_amount
    }

    pub fn taxes_discount_amount(&self) -> &BigDecimal {
        &self.taxes_discount_amount
    }

    pub fn other_discount_amount(&self) -> &BigDecimal {
        &self.other_discount_amount
    }

    pub fn gross_salary(&self) -> &BigDecimal {
        &self.gross_salary
    }

    pub fn gross_payment(&self) -> &BigDecimal {
        &self.gross_payment
    }

    pub fn net_payment(&self) -> &BigDecimal {
        &self.net_payment
    }

    pub fn period(&self) -> NaiveDate {
        self.period
    }

    /// Sum of the four discounts
    pub fn total_discounts(&self) -> BigDecimal {
        &self.health_discount_amount
            + &self.social_discount_amount
            + &self.taxes_discount_amount
            + &self.other_discount_amount
    }

    /// Name of the PDF attached to this employee's email
    pub fn attachment_filename(&self) -> String {
        format!("paystub_{}.pdf", self.email)
    }
}

fn required_text(row: &RawRow, field: &str) -> Result<String, RowError> {
    row.non_blank(field)
        .map(str::to_string)
        .ok_or_else(|| RowError::MissingOrInvalidField(field.to_string()))
}

/// Decimal whose exponent stays within `MAX_AMOUNT_SCALE`; arithmetic on
/// `1e-10000000` rescales to ten million digits
fn parse_amount(value: &str) -> Option<BigDecimal> {
    let amount = BigDecimal::from_str(value).ok()?;
    let (_, scale) = amount.as_bigint_and_exponent();
    (-MAX_AMOUNT_SCALE..=MAX_AMOUNT_SCALE)
        .contains(&scale)
        .then_some(amount)
}

fn required_amount(row: &RawRow, field: &str) -> Result<BigDecimal, RowError> {
    row.non_blank(field)
        .and_then(parse_amount)
        .ok_or_else(|| RowError::MissingOrInvalidField(field.to_string()))
}

fn discount(row: &RawRow, field: &str) -> Result<BigDecimal, RowError> {
    let amount = match row.non_blank(field) {
        None => return Ok(BigDecimal::from(0)),
        Some(v) => {
            parse_amount(v).ok_or_else(|| RowError::MissingOrInvalidField(field.to_string()))?
        }
    };

    if amount < BigDecimal::from(0) {
        return Err(RowError::NegativeDiscount(field.to_string()));
    }
    Ok(amount)
}
