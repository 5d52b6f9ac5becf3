// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Row types produced by CSV tokenization
// No I/O, no async

mod csv_row;

pub use csv_row::{RawRow, UNKNOWN_EMAIL};

use std::collections::HashMap;

pub type FieldMap = HashMap<String, String>;
