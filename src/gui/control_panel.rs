//! Control Panel Widget
//! Left side panel: notebook source, cell outline, export buttons and status.

use crate::notebook::{Cell, CellKind};
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

const OUTLINE_CHARS: usize = 32;

/// One row of the cell outline.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSummary {
    pub kind: CellKind,
    pub line: usize,
    pub text: String,
    pub hidden: bool,
}

impl CellSummary {
    /// Title of the cell if it has one, otherwise its first non-blank line, shortened.
    pub fn from_cell(cell: &Cell) -> Self {
        let text = cell
            .title
            .clone()
            .or_else(|| {
                cell.source
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_default();
        let text = if text.chars().count() > OUTLINE_CHARS {
            let short: String = text.chars().take(OUTLINE_CHARS - 1).collect();
            format!("{}…", short)
        } else {
            text
        };

        Self {
            kind: cell.kind,
            line: cell.line,
            text,
            hidden: cell.hides_code(),
        }
    }

    fn badge(&self) -> &'static str {
        match self.kind {
            CellKind::Code => "code",
            CellKind::Markdown => "md",
            CellKind::Raw => "raw",
        }
    }
}

/// Left side control panel with the notebook outline and export controls.
pub struct ControlPanel {
    pub notebook_path: Option<PathBuf>,
    pub outline: Vec<CellSummary>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            notebook_path: None,
            outline: Vec::new(),
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cells(&mut self, cells: &[Cell]) {
        self.outline = cells.iter().map(CellSummary::from_cell).collect();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 mpl-slides")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Notebook Section =====
        ui.label(RichText::new("📁 Notebook").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self
                        .notebook_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "Built-in scores".to_string());

                    ui.label(RichText::new(&name).size(12.0).color(
                        if self.notebook_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Open").clicked() {
                            action = ControlPanelAction::OpenNotebook;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Cell Outline =====
        ui.label(RichText::new("🗂 Cells").size(14.0).strong());
        ui.add_space(5.0);

        if self.outline.is_empty() {
            ui.label(RichText::new("No notebook loaded").color(Color32::GRAY));
        } else {
            ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                for cell in &self.outline {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("{:>4}", cell.line))
                                .monospace()
                                .color(Color32::GRAY),
                        );
                        ui.label(RichText::new(cell.badge()).monospace().strong());
                        let text = RichText::new(&cell.text).size(12.0);
                        ui.label(if cell.hidden { text.italics() } else { text });
                    });
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                for (label, target) in [
                    ("🖼 Export PNG", ControlPanelAction::ExportPng),
                    ("✏ Export SVG", ControlPanelAction::ExportSvg),
                ] {
                    let button = egui::Button::new(RichText::new(label).size(14.0))
                        .min_size(egui::vec2(150.0, 30.0));
                    if ui.add(button).clicked() {
                        action = target;
                    }
                    ui.add_space(6.0);
                }
            });

            ui.add_enabled_ui(self.notebook_path.is_some(), |ui| {
                let ppt_button = egui::Button::new(RichText::new("📄 Export PPTX").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(ppt_button).clicked() {
                    action = ControlPanelAction::ExportPptx;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenNotebook,
    ExportPng,
    ExportSvg,
    ExportPptx,
}
