//! mpl-slides - stacked bar chart renderer and slide deck builder
//!
//! Draws the "scores by group and gender" figure from built-in data or from
//! the chart cell of a percent-format notebook, and turns such notebooks into
//! PPTX decks.

mod charts;
mod config;
mod data;
mod deck;
mod error;
mod gui;
mod logger;
mod notebook;
mod ppt;

use anyhow::{Context, Result};
use charts::{ChartRenderer, StackedBarChart};
use clap::Parser;
use config::{Cli, Command, FigureFormat, RenderConfig};
use data::GroupedScores;
use deck::Deck;
use eframe::egui;
use gui::SlidesApp;
use notebook::Notebook;
use ppt::PptGenerator;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let config = RenderConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Command::Render {
            notebook,
            output,
            open,
        } => render(&config, notebook.as_deref(), &output, open),
        Command::Show { notebook } => show(config, notebook),
        Command::Inspect { notebook } => inspect(&notebook),
        Command::Deck {
            notebook,
            output,
            open,
        } => build_deck(&config, &notebook, &output, open),
    }
}

fn load_chart(notebook: Option<&Path>) -> Result<StackedBarChart> {
    match notebook {
        Some(path) => {
            let nb = Notebook::from_path(path)
                .with_context(|| format!("Failed to read notebook {}", path.display()))?;
            nb.first_chart()
                .with_context(|| format!("No usable chart cell in {}", path.display()))
        }
        None => GroupedScores::default()
            .to_chart()
            .context("Built-in scores are inconsistent"),
    }
}

fn render(config: &RenderConfig, notebook: Option<&Path>, output: &Path, open: bool) -> Result<()> {
    let chart = load_chart(notebook)?;
    let format = FigureFormat::for_path(output, config.figure.format);
    ChartRenderer::render_file(
        &chart,
        output,
        format,
        config.figure.width,
        config.figure.height,
    )
    .with_context(|| format!("Failed to render {}", output.display()))?;

    if open {
        open_file(output)?;
    }
    Ok(())
}

fn show(config: RenderConfig, notebook: Option<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("mpl-slides"),
        ..Default::default()
    };

    eframe::run_native(
        "mpl-slides",
        options,
        Box::new(|_cc| Ok(Box::new(SlidesApp::new(config, notebook)))),
    )
    .map_err(|e| anyhow::anyhow!("Viewer failed: {}", e))
}

fn inspect(path: &Path) -> Result<()> {
    let nb = Notebook::from_path(path)
        .with_context(|| format!("Failed to read notebook {}", path.display()))?;
    let report = serde_json::json!({
        "metadata": nb.metadata,
        "targets": nb.metadata.output_targets(),
        "kernel": nb.metadata.kernel_name(),
        "language": nb.metadata.language(),
        "cells": nb.cells,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_deck(config: &RenderConfig, path: &Path, output: &Path, open: bool) -> Result<()> {
    let nb = Notebook::from_path(path)
        .with_context(|| format!("Failed to read notebook {}", path.display()))?;
    for target in nb.metadata.output_targets() {
        tracing::warn!(
            "Output target '{}' is left to the external renderer; writing PPTX only",
            target.name
        );
    }

    let deck = Deck::from_notebook(&nb, config).context("Failed to build slides")?;
    PptGenerator::write(&deck, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if open {
        open_file(output)?;
    }
    Ok(())
}

fn open_file(path: &Path) -> Result<()> {
    open::that(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(())
}
