//! Charts module - Bar chart rendering

mod renderer;

pub use renderer::{BarChart, ChartError, StaticChartRenderer};
