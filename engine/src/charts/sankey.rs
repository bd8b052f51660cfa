// Sankey chart: nodes and aggregated flows from source/target/value rows
use super::ChartBuilder;
use crate::config::settings::SankeySettings;
use crate::data::table::Table;
use crate::error::EngineError;
use serde_json::Value;
use shared::models::{ChartData, ChartKind, SankeyGraph, SankeyLink, SankeyNode};
use std::collections::HashMap;

pub struct SankeyChartBuilder {
    settings: SankeySettings,
}

impl SankeyChartBuilder {
    pub fn new(settings: SankeySettings) -> Self {
        Self { settings }
    }
}

impl ChartBuilder for SankeyChartBuilder {
    fn kind(&self) -> ChartKind {
        ChartKind::Sankey
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "source_column": self.settings.source_column,
            "target_column": self.settings.target_column,
            "value_column": self.settings.value_column,
        })
    }

    fn build(&self, table: &Table) -> Result<ChartData, EngineError> {
        let source_col = table.require_column(&self.settings.source_column)?;
        let target_col = table.require_column(&self.settings.target_column)?;
        let value_col = table.require_column(&self.settings.value_column)?;

        // Aggregate duplicate pairs, keeping first-seen order
        let mut flows: Vec<(String, String, i64)> = Vec::new();
        let mut positions: HashMap<(String, String), usize> = HashMap::new();

        for row in 0..table.len() {
            let source = table.text(row, source_col).map(str::trim).unwrap_or("");
            let target = table.text(row, target_col).map(str::trim).unwrap_or("");
            if source.is_empty() || target.is_empty() {
                tracing::debug!(row, "Skipping Sankey row without source or target");
                continue;
            }
            let value = table.numeric(row, value_col);
            let key = (source.to_string(), target.to_string());
            match positions.get(&key) {
                Some(&pos) => flows[pos].2 = flows[pos].2.saturating_add(value),
                None => {
                    positions.insert(key, flows.len());
                    flows.push((source.to_string(), target.to_string(), value));
                }
            }
        }

        let mut graph = SankeyGraph::default();
        let mut node_ids: HashMap<String, usize> = HashMap::new();

        for (source, target, value) in flows {
            if source == target {
                tracing::warn!(node = %source, value, "Dropping self-referencing Sankey link");
                continue;
            }
            if value <= 0 {
                tracing::warn!(source = %source, target = %target, value, "Dropping non-positive Sankey link");
                continue;
            }
            let source = node_id(&mut graph, &mut node_ids, source);
            let target = node_id(&mut graph, &mut node_ids, target);
            graph.links.push(SankeyLink { source, target, value });
        }

        Ok(ChartData::Sankey(graph))
    }
}

fn node_id(graph: &mut SankeyGraph, node_ids: &mut HashMap<String, usize>, name: String) -> usize {
    *node_ids.entry(name).or_insert_with_key(|name| {
        graph.nodes.push(SankeyNode { name: name.clone() });
        graph.nodes.len() - 1
    })
}
