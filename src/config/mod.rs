//! Config module - command line and TOML settings

mod cli;
mod settings;

pub use cli::{Cli, Command};
pub use settings::{FigureFormat, RenderConfig};
