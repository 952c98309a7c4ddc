//! mpl-slides Main Application
//! Main window with control panel and the interactive chart.

use crate::charts::{ChartPlotter, ChartRenderer, StackedBarChart};
use crate::config::{FigureFormat, RenderConfig};
use crate::data::GroupedScores;
use crate::deck::Deck;
use crate::error::Result;
use crate::gui::{ControlPanel, ControlPanelAction};
use crate::notebook::Notebook;
use crate::ppt::PptGenerator;
use egui::{RichText, SidePanel};
use std::path::{Path, PathBuf};

/// Main application window.
pub struct SlidesApp {
    config: RenderConfig,
    control_panel: ControlPanel,
    notebook: Option<Notebook>,
    chart: Option<StackedBarChart>,
}

impl SlidesApp {
    /// Starts on the given notebook, or on the built-in scores when there is none.
    pub fn new(config: RenderConfig, notebook_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            config,
            control_panel: ControlPanel::new(),
            notebook: None,
            chart: None,
        };
        match notebook_path {
            Some(path) => app.load_notebook(path),
            None => app.load_builtin(),
        }
        app
    }

    fn load_builtin(&mut self) {
        match GroupedScores::default().to_chart() {
            Ok(chart) => {
                self.chart = Some(chart);
                self.control_panel.export_enabled = true;
                self.control_panel.set_status("Showing built-in scores");
            }
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }

    fn load_notebook(&mut self, path: PathBuf) {
        self.control_panel.notebook_path = Some(path.clone());
        let notebook = match Notebook::from_path(&path) {
            Ok(nb) => nb,
            Err(e) => {
                self.notebook = None;
                self.chart = None;
                self.control_panel.outline.clear();
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(format!("Error: {}", e));
                return;
            }
        };

        self.control_panel.set_cells(&notebook.cells);
        match notebook.first_chart() {
            Ok(chart) => {
                self.chart = Some(chart);
                self.control_panel.export_enabled = true;
                self.control_panel
                    .set_status(format!("Loaded {} cells", notebook.cells.len()));
            }
            Err(e) => {
                tracing::warn!("No chart in {}: {}", path.display(), e);
                self.chart = None;
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
        self.notebook = Some(notebook);
    }

    fn handle_open_notebook(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Percent notebook", &["py"])
            .pick_file()
        {
            self.load_notebook(path);
        }
    }

    fn handle_export_figure(&mut self, format: FigureFormat) {
        let Some(chart) = &self.chart else {
            self.control_panel.set_status("No chart to export");
            return;
        };
        let (filter, file_name) = match format {
            FigureFormat::Png => ("png", "scores.png"),
            FigureFormat::Svg => ("svg", "scores.svg"),
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter.to_uppercase(), &[filter])
            .set_file_name(file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        let (w, h) = (self.config.figure.width, self.config.figure.height);
        let result = ChartRenderer::render_file(chart, &path, format, w, h).map_err(Into::into);
        self.report(result, &path);
    }

    fn handle_export_pptx(&mut self) {
        let Some(notebook) = &self.notebook else {
            self.control_panel.set_status("Open a notebook to build a deck");
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PowerPoint", &["pptx"])
            .set_file_name("slides.pptx")
            .save_file()
        else {
            return;
        };

        let result = Deck::from_notebook(notebook, &self.config)
            .and_then(|deck| PptGenerator::write(&deck, &path));
        self.report(result, &path);
    }

    fn report(&mut self, result: Result<()>, path: &Path) {
        match result {
            Ok(()) => self
                .control_panel
                .set_status(format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!("Export to {} failed: {}", path.display(), e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for SlidesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::OpenNotebook => self.handle_open_notebook(),
                        ControlPanelAction::ExportPng => {
                            self.handle_export_figure(FigureFormat::Png)
                        }
                        ControlPanelAction::ExportSvg => {
                            self.handle_export_figure(FigureFormat::Svg)
                        }
                        ControlPanelAction::ExportPptx => self.handle_export_pptx(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart
        egui::CentralPanel::default().show(ctx, |ui| match &self.chart {
            Some(chart) => {
                let height = (ui.available_height() - 40.0).max(200.0);
                ChartPlotter::draw_stacked_bar_chart(ui, chart, height);
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Chart").size(20.0));
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::fixtures::DEMO_NOTEBOOK;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_chart_without_notebook() {
        let app = SlidesApp::new(RenderConfig::default(), None);
        assert!(app.notebook.is_none());
        assert_eq!(app.chart, GroupedScores::default().to_chart().ok());
        assert!(app.control_panel.export_enabled);
    }

    #[test]
    fn test_loads_demo_notebook() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DEMO_NOTEBOOK.as_bytes()).unwrap();

        let app = SlidesApp::new(RenderConfig::default(), Some(file.path().to_path_buf()));
        assert_eq!(app.control_panel.outline.len(), 2);
        assert_eq!(app.chart, GroupedScores::default().to_chart().ok());
        assert_eq!(app.control_panel.status, "Loaded 2 cells");
    }

    #[test]
    fn test_missing_notebook_reports_error() {
        let app = SlidesApp::new(
            RenderConfig::default(),
            Some(PathBuf::from("/nonexistent/deck.py")),
        );
        assert!(app.chart.is_none());
        assert!(!app.control_panel.export_enabled);
        assert!(app.control_panel.status.starts_with("Error"));
    }
}
