use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration parse error: {source}")]
    ConfigParseError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Chart build error: {0}")]
    ChartError(String),

    // Catch-all for anyhow errors when direct conversion is suitable
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::CsvDataFormatError("Missing column 'value'".to_string());
        assert_eq!(err.to_string(), "CSV data format error: Missing column 'value'");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::IoError { .. }));
        assert!(err.to_string().starts_with("I/O error:"));
    }

    #[test]
    fn test_json_error_converts_to_parse_error() {
        let err: EngineError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, EngineError::ConfigParseError { .. }));
    }
}
