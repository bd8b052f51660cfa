// Loads chart data and builds chart datasets according to the engine settings
use crate::charts::{builder_for, ChartBuilder};
use crate::config::settings::EngineSettings;
use crate::data::csv_parser::ChartCsvParser;
use crate::data::table::Table;
use crate::error::EngineError;
use shared::models::ChartData;
use std::io::Read;
use std::path::Path;

pub struct ChartService {
    settings: EngineSettings,
}

impl ChartService {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(ChartService { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn load_table(&self, path: impl AsRef<Path>) -> Result<Table, EngineError> {
        ChartCsvParser::load_table(path, &self.settings.csv)
    }

    pub fn read_table<R: Read>(&self, reader: R) -> Result<Table, EngineError> {
        ChartCsvParser::parse_table(reader, &self.settings.csv)
    }

    pub fn build_chart(&self, table: &Table) -> Result<ChartData, EngineError> {
        let builder: Box<dyn ChartBuilder> = builder_for(&self.settings.chart);
        tracing::info!(
            kind = ?builder.kind(),
            parameters = %builder.parameters(),
            rows = table.len(),
            "Building chart dataset"
        );
        let chart = builder.build(table)?;
        match &chart {
            ChartData::Bar(series) => {
                tracing::info!(bars = series.data.len(), total = series.total(), "Bar series ready")
            }
            ChartData::Sankey(graph) => tracing::info!(
                nodes = graph.nodes.len(),
                links = graph.links.len(),
                flow = graph.total_flow(),
                "Sankey graph ready"
            ),
        }
        Ok(chart)
    }

    pub fn chart_from_csv(&self, path: impl AsRef<Path>) -> Result<ChartData, EngineError> {
        let table = self.load_table(path)?;
        self.build_chart(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{ChartSettings, CsvSettings, SankeySettings};
    use shared::models::ChartKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_chart_from_csv_bar() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "label,value\nA,\"1,000\"\nB,250%\nA,(100)").unwrap();
        let service = ChartService::new(EngineSettings::default()).unwrap();
        let chart = service.chart_from_csv(file.path()).unwrap();
        match chart {
            ChartData::Bar(series) => {
                assert_eq!(series.data.len(), 2);
                assert_eq!(series.data[0].value, 900);
                assert_eq!(series.data[1].value, 2);
            }
            other => panic!("expected a bar series, got {:?}", other),
        }
    }

    #[test]
    fn test_read_table_sankey() {
        let settings = EngineSettings {
            csv: CsvSettings { delimiter: '\t', has_headers: true },
            chart: ChartSettings::Sankey(SankeySettings {
                source_column: "from".to_string(),
                target_column: "to".to_string(),
                value_column: "amount".to_string(),
            }),
        };
        let service = ChartService::new(settings).unwrap();
        let table = service.read_table("from\tto\tamount\nIn\tOut\t€12,50".as_bytes()).unwrap();
        let chart = service.build_chart(&table).unwrap();
        assert_eq!(chart.kind(), ChartKind::Sankey);
        match chart {
            // A lone comma is read as a thousands separator.
            ChartData::Sankey(graph) => assert_eq!(graph.total_flow(), 1250),
            other => panic!("expected a Sankey graph, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = EngineSettings {
            csv: CsvSettings { delimiter: '"', has_headers: true },
            ..EngineSettings::default()
        };
        assert!(ChartService::new(settings).is_err());
    }
}
