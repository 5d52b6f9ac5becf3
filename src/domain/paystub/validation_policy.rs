use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::domain::error::{AppError, Result};

/// Tunables for paystub validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationPolicy {
    /// Largest accepted gap (inclusive) between declared and computed net payment
    pub reconciliation_tolerance: BigDecimal,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            reconciliation_tolerance: BigDecimal::from(1),
        }
    }
}

impl ValidationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from a configured tolerance such as `"1"` or `"0.01"`
    pub fn with_tolerance(tolerance: &str) -> Result<Self> {
        let reconciliation_tolerance = BigDecimal::from_str(tolerance.trim()).map_err(|e| {
            AppError::ConfigError(format!(
                "Invalid reconciliation tolerance '{}': {}",
                tolerance, e
            ))
        })?;

        let policy = Self {
            reconciliation_tolerance,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.reconciliation_tolerance < BigDecimal::from(0) {
            return Err(AppError::ConfigError(
                "reconciliation tolerance must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}
