// In-memory table of CSV cells, with numeric access through the shared normalizer
use crate::error::EngineError;
use shared::number::{normalize, NumericInput};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// Looks a column up by exact header, then by trimmed case-insensitive header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name).or_else(|| {
            let wanted = name.trim();
            self.headers.iter().position(|h| h.trim().eq_ignore_ascii_case(wanted))
        })
    }

    pub fn require_column(&self, name: &str) -> Result<usize, EngineError> {
        self.column_index(name).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!(
                "Missing column '{}' (available: {})",
                name,
                self.headers.join(", ")
            ))
        })
    }

    pub fn text(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column)).map(String::as_str)
    }

    /// The cell as an integer. Missing cells and unparseable text are 0.
    pub fn numeric(&self, row: usize, column: usize) -> i64 {
        normalize(NumericInput::from(self.text(row, column)))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
