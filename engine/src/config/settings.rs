// Engine settings, loaded from a JSON file and overridden by command-line flags
use crate::error::EngineError;
use serde::Deserialize;
use shared::models::ChartKind;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub csv: CsvSettings,
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CsvSettings {
    pub delimiter: char,
    pub has_headers: bool,
}

impl Default for CsvSettings {
    fn default() -> Self {
        CsvSettings {
            delimiter: ',',
            has_headers: true,
        }
    }
}

impl CsvSettings {
    pub fn delimiter_byte(&self) -> Result<u8, EngineError> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(EngineError::ConfigError(format!(
                "CSV delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                self.delimiter
            )));
        }
        Ok(self.delimiter as u8)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartSettings {
    Bar(BarSettings),
    Sankey(SankeySettings),
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings::Bar(BarSettings::default())
    }
}

impl ChartSettings {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSettings::Bar(_) => ChartKind::Bar,
            ChartSettings::Sankey(_) => ChartKind::Sankey,
        }
    }

    fn columns(&self) -> Vec<(&'static str, &str)> {
        match self {
            ChartSettings::Bar(bar) => vec![
                ("label_column", bar.label_column.as_str()),
                ("value_column", bar.value_column.as_str()),
            ],
            ChartSettings::Sankey(sankey) => vec![
                ("source_column", sankey.source_column.as_str()),
                ("target_column", sankey.target_column.as_str()),
                ("value_column", sankey.value_column.as_str()),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BarSort {
    /// Keep the order in which labels first appear in the data.
    #[default]
    Input,
    #[serde(alias = "desc")]
    Descending,
    #[serde(alias = "asc")]
    Ascending,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BarSettings {
    pub label_column: String,
    pub value_column: String,
    pub series_name: String,
    pub sort: BarSort,
    pub limit: Option<usize>,
}

impl Default for BarSettings {
    fn default() -> Self {
        BarSettings {
            label_column: "label".to_string(),
            value_column: "value".to_string(),
            series_name: "value".to_string(),
            sort: BarSort::Input,
            limit: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SankeySettings {
    pub source_column: String,
    pub target_column: String,
    pub value_column: String,
}

impl Default for SankeySettings {
    fn default() -> Self {
        SankeySettings {
            source_column: "source".to_string(),
            target_column: "target".to_string(),
            value_column: "value".to_string(),
        }
    }
}

impl EngineSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let settings = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), kind = ?settings.chart.kind(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.csv.delimiter_byte()?;
        for (field, column) in self.chart.columns() {
            if column.trim().is_empty() {
                return Err(EngineError::ConfigError(format!("'{}' must not be empty", field)));
            }
        }
        if let ChartSettings::Bar(BarSettings { limit: Some(0), .. }) = self.chart {
            return Err(EngineError::ConfigError("'limit' must be greater than 0".to_string()));
        }
        Ok(())
    }
}
