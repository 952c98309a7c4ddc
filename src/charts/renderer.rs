//! Static Chart Renderer
//! Draws a StackedBarChart with plotters onto a bitmap or SVG backend.
//!
//! Layout mirrors matplotlib's default bar figure:
//! 1. Title centred above the axes
//! 2. Category labels under each bar slot, y label rotated on the left
//! 3. Bars per series, stacked where a series has a bottom
//! 4. Black error whiskers with caps at each bar top
//! 5. Legend box in the upper right

use crate::charts::layout::{self, BarRect};
use crate::charts::{ChartError, StackedBarChart};
use crate::config::FigureFormat;
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// matplotlib "tab10" palette, first entries
pub const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
];

const FONT: &str = "sans-serif";
const CAP_PX: u32 = 6;

pub struct ChartRenderer;

impl ChartRenderer {
    pub fn series_color(idx: usize) -> RGBColor {
        PALETTE[idx % PALETTE.len()]
    }

    /// Render straight to a PNG (or any bitmap format plotters infers from the extension).
    pub fn render_png(
        chart: &StackedBarChart,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ChartError> {
        chart.validate()?;
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        Self::draw(&root, chart).map_err(|e| ChartError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| ChartError::Render(e.to_string()))?;
        tracing::info!("Chart written to {}", path.display());
        Ok(())
    }

    /// Render into memory and encode as PNG, for embedding in decks.
    pub fn render_png_bytes(
        chart: &StackedBarChart,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ChartError> {
        chart.validate()?;
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(3))
            .ok_or_else(|| {
                ChartError::Render(format!("figure size {}x{} is too large", width, height))
            })?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, chart).map_err(|e| ChartError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Render("pixel buffer size mismatch".into()))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| ChartError::Render(e.to_string()))?;
        Ok(png)
    }

    pub fn render_svg_string(
        chart: &StackedBarChart,
        width: u32,
        height: u32,
    ) -> Result<String, ChartError> {
        chart.validate()?;
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            Self::draw(&root, chart).map_err(|e| ChartError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }
        Ok(svg)
    }

    pub fn render_svg(
        chart: &StackedBarChart,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ChartError> {
        let svg = Self::render_svg_string(chart, width, height)?;
        fs::write(path, svg).map_err(|e| ChartError::Render(e.to_string()))?;
        tracing::info!("Chart written to {}", path.display());
        Ok(())
    }

    /// Write a PNG or SVG file depending on `format`.
    pub fn render_file(
        chart: &StackedBarChart,
        path: &Path,
        format: FigureFormat,
        width: u32,
        height: u32,
    ) -> Result<(), ChartError> {
        match format {
            FigureFormat::Png => Self::render_png(chart, path, width, height),
            FigureFormat::Svg => Self::render_svg(chart, path, width, height),
        }
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &StackedBarChart,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let (x_min, x_max) = layout::category_range(chart);
        let (y_min, y_max) = layout::value_range(chart);

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60);
        if let Some(title) = &chart.title {
            builder.caption(title, (FONT, 22));
        }
        let mut ctx = builder.build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let tick_fmt = |x: &f64| layout::tick_label(chart, *x);
        let mut mesh = ctx.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .x_labels(chart.len() + 1)
            .x_label_formatter(&tick_fmt)
            .label_style((FONT, 14));
        if let Some(y_label) = &chart.y_label {
            mesh.y_desc(y_label.as_str());
        }
        if let Some(x_label) = &chart.x_label {
            mesh.x_desc(x_label.as_str());
        }
        mesh.axis_desc_style((FONT, 16)).draw()?;

        let rects = layout::bar_rects(chart);
        for (s, series) in chart.series.iter().enumerate() {
            let color = Self::series_color(s);
            let bars: Vec<BarRect> = rects.iter().filter(|r| r.series == s).copied().collect();
            let drawn = ctx.draw_series(
                bars.iter()
                    .map(|r| Rectangle::new([(r.x0, r.y0), (r.x1, r.y1)], color.filled())),
            )?;
            if chart.legend_entries().contains(&series.label.as_str()) {
                drawn.label(series.label.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled())
                });
            }
        }

        ctx.draw_series(layout::error_bars(chart).iter().map(|w| {
            ErrorBar::new_vertical(w.x, w.low, w.mid, w.high, BLACK.stroke_width(1), CAP_PX)
        }))?;

        if chart.show_legend && !chart.legend_entries().is_empty() {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK.mix(0.3))
                .label_font((FONT, 14))
                .draw()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GroupedScores;
    use tempfile::tempdir;

    #[test]
    fn test_invalid_chart_is_rejected_before_drawing() {
        let chart = StackedBarChart::new(["a"]).bar_width(-1.0);
        let err = ChartRenderer::render_svg_string(&chart, 400, 300).unwrap_err();
        assert_eq!(err, ChartError::InvalidWidth(-1.0));
    }

    #[test]
    fn test_oversized_bitmap_is_an_error() {
        let chart = GroupedScores::default().to_chart().unwrap();
        let err = ChartRenderer::render_png_bytes(&chart, u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(err, ChartError::Render(ref m) if m.contains("too large")));
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(ChartRenderer::series_color(0), PALETTE[0]);
        assert_eq!(ChartRenderer::series_color(PALETTE.len() + 1), PALETTE[1]);
    }

    #[test]
    fn test_svg_contains_labels() {
        let chart = GroupedScores::default().to_chart().unwrap();
        let svg = ChartRenderer::render_svg_string(&chart, 800, 600).unwrap();
        assert!(svg.contains("Scores broken out by group and gender"));
        assert!(svg.contains("Women"));
        assert!(svg.contains("G6"));
    }

    #[test]
    fn test_png_bytes_and_file() {
        let chart = GroupedScores::default().to_chart().unwrap();
        let png = ChartRenderer::render_png_bytes(&chart, 640, 480).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.png");
        ChartRenderer::render_png(&chart, &path, 640, 480).unwrap();
        assert!(path.exists());

        let svg_path = dir.path().join("scores.svg");
        ChartRenderer::render_file(&chart, &svg_path, FigureFormat::Svg, 640, 480).unwrap();
        let svg = std::fs::read_to_string(&svg_path).unwrap();
        assert!(svg.contains("<svg"));
    }
}
