use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Sankey,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BarDatum {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BarSeries {
    pub name: String,
    pub data: Vec<BarDatum>,
}

impl BarSeries {
    pub fn total(&self) -> i64 {
        self.data.iter().fold(0i64, |acc, d| acc.saturating_add(d.value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SankeyNode {
    pub name: String,
}

/// A flow between two nodes, referenced by their index in [`SankeyGraph::nodes`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SankeyGraph {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

impl SankeyGraph {
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn total_flow(&self) -> i64 {
        self.links.iter().fold(0i64, |acc, l| acc.saturating_add(l.value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ChartData {
    Bar(BarSeries),
    Sankey(SankeyGraph),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Bar(_) => ChartKind::Bar,
            ChartData::Sankey(_) => ChartKind::Sankey,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_series_total_saturates() {
        let series = BarSeries {
            name: "revenue".to_string(),
            data: vec![
                BarDatum { label: "a".to_string(), value: i64::MAX },
                BarDatum { label: "b".to_string(), value: 10 },
            ],
        };
        assert_eq!(series.total(), i64::MAX);
    }

    #[test]
    fn test_sankey_lookup_and_flow() {
        let graph = SankeyGraph {
            nodes: vec![
                SankeyNode { name: "Budget".to_string() },
                SankeyNode { name: "Rent".to_string() },
            ],
            links: vec![SankeyLink { source: 0, target: 1, value: 1200 }],
        };
        assert_eq!(graph.node_index("Rent"), Some(1));
        assert_eq!(graph.node_index("Food"), None);
        assert_eq!(graph.total_flow(), 1200);
    }

    #[test]
    fn test_chart_data_serializes_with_kind_tag() {
        let chart = ChartData::Bar(BarSeries { name: "s".to_string(), data: vec![] });
        assert_eq!(chart.kind(), ChartKind::Bar);
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "bar");
        assert_eq!(json["data"]["name"], "s");
    }
}
