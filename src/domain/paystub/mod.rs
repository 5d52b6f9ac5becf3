// ============================================================
// PAYSTUB DOMAIN LAYER
// ============================================================
// Validated paystub record and the rules a raw row must pass

mod record;
mod validation_policy;

pub use record::{PaystubRecord, DISCOUNT_FIELDS};
pub use validation_policy::ValidationPolicy;

#[cfg(test)]
pub(crate) mod fixtures;
