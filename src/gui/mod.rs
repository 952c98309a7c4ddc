//! GUI module - User interface components

mod app;
mod control_panel;

pub use app::SlidesApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
