use crate::config::settings::CsvSettings;
use crate::data::table::Table;
use crate::error::EngineError;
use anyhow::Context;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct ChartCsvParser;

impl ChartCsvParser {
    // Header: label;value  or  source;target;value
    // Example Row: Salary;Budget;"$4,200.00"
    pub fn load_table(file_path: impl AsRef<Path>, settings: &CsvSettings) -> Result<Table, EngineError> {
        let path = file_path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open CSV file '{}'", path.display()))?;
        let table = Self::parse_table(BufReader::new(file), settings)?;
        tracing::info!(path = %path.display(), rows = table.len(), columns = table.headers.len(), "Loaded CSV table");
        Ok(table)
    }

    pub fn parse_table<R: Read>(reader: R, settings: &CsvSettings) -> Result<Table, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(settings.delimiter_byte()?)
            .has_headers(settings.has_headers)
            .flexible(true) // Short rows read as missing cells
            .from_reader(reader);

        let mut headers: Vec<String> = if settings.has_headers {
            rdr.headers()?
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| {
                let line = e
                    .position()
                    .map_or_else(|| "unknown".to_string(), |p| p.line().to_string());
                EngineError::CsvDataFormatError(format!("Error reading CSV record at line {}: {}", line, e))
            })?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if !settings.has_headers {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            headers = (1..=width).map(|i| format!("column_{}", i)).collect();
        }

        tracing::debug!(rows = rows.len(), columns = headers.len(), "Parsed CSV table");
        Ok(Table::new(headers, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    fn semicolon() -> CsvSettings {
        CsvSettings { delimiter: ';', has_headers: true }
    }

    #[test]
    fn test_load_table_valid_data() {
        let csv_content = "\
source;target;value
Salary;Budget;$4.200,00
Budget;Rent;(1.200,00)
Budget;Savings;15%";
        let tmp_file = create_test_csv(csv_content);
        let table = ChartCsvParser::load_table(tmp_file.path(), &semicolon()).unwrap();

        assert_eq!(table.headers, vec!["source", "target", "value"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.text(0, 0), Some("Salary"));
        assert_eq!(table.numeric(0, 2), 4200);
        assert_eq!(table.numeric(1, 2), -1200);
        assert_eq!(table.numeric(2, 2), 0);
    }

    #[test]
    fn test_quoted_fields_keep_delimiters() {
        let csv_content = "label,value\n\"North, East\",\"1,234,567\"";
        let table = ChartCsvParser::parse_table(csv_content.as_bytes(), &CsvSettings::default()).unwrap();
        assert_eq!(table.text(0, 0), Some("North, East"));
        assert_eq!(table.numeric(0, 1), 1234567);
    }

    #[test]
    fn test_load_table_header_only() {
        let tmp_file = create_test_csv("label,value");
        let table = ChartCsvParser::load_table(tmp_file.path(), &CsvSettings::default()).unwrap();
        assert_eq!(table.headers, vec!["label", "value"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_without_headers_synthesizes_column_names() {
        let settings = CsvSettings { delimiter: ',', has_headers: false };
        let table = ChartCsvParser::parse_table("a,1\nb,2,extra".as_bytes(), &settings).unwrap();
        assert_eq!(table.headers, vec!["column_1", "column_2", "column_3"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.text(1, 2), Some("extra"));
        assert_eq!(table.text(0, 2), None);
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        let table = ChartCsvParser::parse_table("label,value\nonly-label".as_bytes(), &CsvSettings::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.numeric(0, 1), 0);
    }

    #[test]
    fn test_byte_order_mark_is_dropped_from_headers() {
        let table = ChartCsvParser::parse_table("\u{feff}label,value\nx,1".as_bytes(), &CsvSettings::default()).unwrap();
        assert_eq!(table.column_index("label"), Some(0));
    }

    #[test]
    fn test_invalid_utf8_record_is_reported() {
        let bytes: &[u8] = b"label,value\nx,\xff\xfe\n";
        let result = ChartCsvParser::parse_table(bytes, &CsvSettings::default());
        let err = result.unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("Error reading CSV record"));
    }

    #[test]
    fn test_missing_file() {
        let result = ChartCsvParser::load_table("/no/such/file.csv", &CsvSettings::default());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }

    #[test]
    fn test_invalid_delimiter() {
        let settings = CsvSettings { delimiter: '€', has_headers: true };
        let result = ChartCsvParser::parse_table("a".as_bytes(), &settings);
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }
}
