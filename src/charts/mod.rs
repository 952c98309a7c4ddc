//! Charts module - Chart model and rendering

pub mod layout;
mod model;
mod plotter;
mod renderer;

pub use model::{BarSeries, ChartError, StackedBarChart, DEFAULT_BAR_WIDTH};
pub use plotter::ChartPlotter;
pub use renderer::ChartRenderer;
