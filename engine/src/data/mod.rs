// Loading and accessing tabular chart data
pub mod csv_parser;
pub mod table;
