// ============================================================
// CSV PARSER
// ============================================================
// Turn uploaded CSV bytes into ordered raw payroll rows

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::UTF_8;

use crate::domain::csv::{FieldMap, RawRow};
use crate::domain::error::AppError;

/// CSV parser for payroll uploads
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from headers and values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Decode uploaded bytes (UTF-8, optional BOM) and parse them
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<RawRow>, AppError> {
        let (content, had_errors) = UTF_8.decode_with_bom_removal(bytes);
        if had_errors {
            return Err(AppError::ParseError(
                "CSV upload is not valid UTF-8".to_string(),
            ));
        }

        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Vec<RawRow>, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Short rows are reported per row, not per batch
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            rows.push(Self::parse_row(index, &headers, &record));
        }

        Ok(rows)
    }

    /// Pair each header with its value; columns missing from a short row are left out
    fn parse_row(index: usize, headers: &StringRecord, record: &StringRecord) -> RawRow {
        let fields: FieldMap = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| {
                record
                    .get(idx)
                    .map(|value| (header.to_string(), value.to_string()))
            })
            .collect();

        RawRow::new(index, fields)
    }
}
