// Chart dataset builders
pub mod bar;
pub mod sankey;

use crate::config::settings::ChartSettings;
use crate::data::table::Table;
use crate::error::EngineError;
use serde_json::Value;
use shared::models::{ChartData, ChartKind};

pub use bar::BarChartBuilder;
pub use sankey::SankeyChartBuilder;

// Common trait for all chart builders
pub trait ChartBuilder: Send + Sync {
    fn kind(&self) -> ChartKind;
    fn parameters(&self) -> Value; // Column mapping and options used by this builder
    fn build(&self, table: &Table) -> Result<ChartData, EngineError>;
}

pub fn builder_for(settings: &ChartSettings) -> Box<dyn ChartBuilder> {
    match settings {
        ChartSettings::Bar(bar) => Box::new(BarChartBuilder::new(bar.clone())),
        ChartSettings::Sankey(sankey) => Box::new(SankeyChartBuilder::new(sankey.clone())),
    }
}
