// Data models and number handling shared by the engine and any chart front-end.
pub mod models;
pub mod number;

pub use number::{format_grouped, normalize, NumericInput};
