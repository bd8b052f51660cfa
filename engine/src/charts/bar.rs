// Bar chart: one bar per label, values summed across rows
use super::ChartBuilder;
use crate::config::settings::{BarSettings, BarSort};
use crate::data::table::Table;
use crate::error::EngineError;
use serde_json::Value;
use shared::models::{BarDatum, BarSeries, ChartData, ChartKind};
use std::collections::HashMap;

pub struct BarChartBuilder {
    settings: BarSettings,
}

impl BarChartBuilder {
    pub fn new(settings: BarSettings) -> Self {
        Self { settings }
    }
}

impl ChartBuilder for BarChartBuilder {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "label_column": self.settings.label_column,
            "value_column": self.settings.value_column,
            "series_name": self.settings.series_name,
            "sort": format!("{:?}", self.settings.sort).to_lowercase(),
            "limit": self.settings.limit,
        })
    }

    fn build(&self, table: &Table) -> Result<ChartData, EngineError> {
        let label_col = table.require_column(&self.settings.label_column)?;
        let value_col = table.require_column(&self.settings.value_column)?;

        let mut data: Vec<BarDatum> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for row in 0..table.len() {
            let label = table.text(row, label_col).map(str::trim).unwrap_or("");
            if label.is_empty() {
                tracing::debug!(row, "Skipping bar row without a label");
                continue;
            }
            let value = table.numeric(row, value_col);
            match positions.get(label) {
                Some(&pos) => data[pos].value = data[pos].value.saturating_add(value),
                None => {
                    positions.insert(label.to_string(), data.len());
                    data.push(BarDatum { label: label.to_string(), value });
                }
            }
        }

        // Stable sorts keep first-seen order between equal values
        match self.settings.sort {
            BarSort::Input => {}
            BarSort::Descending => data.sort_by(|a, b| b.value.cmp(&a.value)),
            BarSort::Ascending => data.sort_by_key(|d| d.value),
        }
        if let Some(limit) = self.settings.limit {
            data.truncate(limit);
        }

        Ok(ChartData::Bar(BarSeries {
            name: self.settings.series_name.clone(),
            data,
        }))
    }
}
