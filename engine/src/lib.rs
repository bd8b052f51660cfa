// Engine library root: CSV loading, chart dataset builders and the chart service.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use error::EngineError;
