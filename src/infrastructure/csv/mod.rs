// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Decoding and tokenizing uploaded payroll CSV files

mod csv_parser;

pub use csv_parser::CsvParser;
