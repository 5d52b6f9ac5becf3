//! Payroll rows shared by tests across layers

use super::{PaystubRecord, ValidationPolicy};
use crate::domain::csv::RawRow;

pub const CSV_HEADER: &str = "full_name,email,position,health_discount_amount,social_discount_amount,taxes_discount_amount,other_discount_amount,gross_salary,gross_payment,net_payment,period";

/// A row that passes validation: 4800 gross, 200 of discounts, 4600 net
pub fn payroll_row(index: usize, email: &str) -> RawRow {
    RawRow::from_pairs(
        index,
        [
            ("full_name", "Roberto Camejo"),
            ("email", email),
            ("position", "Software Engineer"),
            ("health_discount_amount", "50"),
            ("social_discount_amount", "30"),
            ("taxes_discount_amount", "100"),
            ("other_discount_amount", "20"),
            ("gross_salary", "5000"),
            ("gross_payment", "4800"),
            ("net_payment", "4600"),
            ("period", "2025-04-30"),
        ],
    )
}

pub fn paystub(email: &str) -> PaystubRecord {
    PaystubRecord::from_row(&payroll_row(0, email), &ValidationPolicy::default())
        .expect("fixture row is valid")
}
