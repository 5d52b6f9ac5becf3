//! Presentation bundles for paystub receipts and the emails carrying them.
//!
//! Each supported country is one entry of [`PROFILES`]; supporting another
//! country means adding an entry there.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::domain::error::{AppError, Result};

/// Receipt field labels, in the order they are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLabels {
    pub name: &'static str,
    pub position: &'static str,
    pub period: &'static str,
    pub gross_salary: &'static str,
    pub gross_payment: &'static str,
    pub net_payment: &'static str,
    pub health: &'static str,
    pub social: &'static str,
    pub taxes: &'static str,
    pub others: &'static str,
    pub total_discounts: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProfileBundle {
    /// Code accepted on the wire (`?country=`)
    pub code: &'static str,
    pub email_subject: &'static str,
    pub email_body: &'static str,
    pub receipt_title: &'static str,
    pub labels: FieldLabels,
}

pub static PROFILES: &[ProfileBundle] = &[
    ProfileBundle {
        code: "do",
        email_subject: "Comprobante de Pago",
        email_body: "Adjunto encontrará su comprobante de pago.",
        receipt_title: "Comprobante de Pago",
        labels: FieldLabels {
            name: "Nombre",
            position: "Cargo",
            period: "Periodo",
            gross_salary: "Salario Bruto",
            gross_payment: "Pago Bruto",
            net_payment: "Pago Neto",
            health: "SFS",
            social: "AFP",
            taxes: "ISR",
            others: "Otros",
            total_discounts: "Total Descuentos",
        },
    },
    ProfileBundle {
        code: "USA",
        email_subject: "Paystub Payment",
        email_body: "Attached is your paystub.",
        receipt_title: "Paystub Payment",
        labels: FieldLabels {
            name: "Name",
            position: "Position",
            period: "Period",
            gross_salary: "Gross Salary",
            gross_payment: "Gross Payment",
            net_payment: "Net Payment",
            health: "Health Insurance",
            social: "Social Security",
            taxes: "Taxes",
            others: "Others",
            total_discounts: "Total Discounts",
        },
    },
];

/// Handle on one entry of [`PROFILES`]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CountryProfile(&'static ProfileBundle);

impl CountryProfile {
    /// Look up a profile by its exact code (`"do"`, `"USA"`)
    pub fn from_code(code: &str) -> Result<Self> {
        PROFILES
            .iter()
            .find(|bundle| bundle.code == code)
            .map(CountryProfile)
            .ok_or_else(|| {
                let known: Vec<&str> = PROFILES.iter().map(|b| b.code).collect();
                AppError::ValidationError(format!(
                    "Unknown country '{}', expected one of: {}",
                    code,
                    known.join(", ")
                ))
            })
    }

    pub fn code(&self) -> &'static str {
        self.0.code
    }

    pub fn bundle(&self) -> &'static ProfileBundle {
        self.0
    }

    pub fn labels(&self) -> &'static FieldLabels {
        &self.0.labels
    }
}

impl Default for CountryProfile {
    fn default() -> Self {
        CountryProfile(&PROFILES[0])
    }
}

impl fmt::Debug for CountryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CountryProfile").field(&self.0.code).finish()
    }
}

impl fmt::Display for CountryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.code)
    }
}

impl Serialize for CountryProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.code)
    }
}

impl<'de> Deserialize<'de> for CountryProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        CountryProfile::from_code(&code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_local() {
        assert_eq!(CountryProfile::default().code(), "do");
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(CountryProfile::from_code("USA").unwrap().code(), "USA");
        assert!(CountryProfile::from_code("usa").is_err());
        assert!(CountryProfile::from_code("mx").is_err());
    }

    #[test]
    fn test_profile_codes_are_unique() {
        for (i, a) in PROFILES.iter().enumerate() {
            for b in &PROFILES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn test_bundles_carry_translations() {
        let local = CountryProfile::from_code("do").unwrap();
        let usa = CountryProfile::from_code("USA").unwrap();
        assert_eq!(local.bundle().email_subject, "Comprobante de Pago");
        assert_eq!(usa.bundle().email_body, "Attached is your paystub.");
        assert_eq!(local.labels().health, "SFS");
        assert_eq!(usa.labels().health, "Health Insurance");
    }

    #[test]
    fn test_deserialize_from_code() {
        let profile: CountryProfile = serde_json::from_str("\"USA\"").unwrap();
        assert_eq!(profile.code(), "USA");
        assert!(serde_json::from_str::<CountryProfile>("\"XX\"").is_err());
    }
}
