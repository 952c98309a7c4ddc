//! Chart Plotter Module
//! Draws a StackedBarChart interactively using egui_plot.

use crate::charts::{layout, ChartRenderer, StackedBarChart};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

/// Whisker cap half-width as a fraction of the bar width
const CAP_FRACTION: f64 = 0.15;

pub struct ChartPlotter;

impl ChartPlotter {
    /// Same palette as the static renderer so both outputs match.
    pub fn series_color(idx: usize) -> Color32 {
        let c = ChartRenderer::series_color(idx);
        Color32::from_rgb(c.0, c.1, c.2)
    }

    /// Build one egui `BarChart` per series. Stacking comes from each series' `bottom`.
    pub fn bar_charts(chart: &StackedBarChart) -> Vec<BarChart> {
        chart
            .series
            .iter()
            .enumerate()
            .map(|(s, series)| {
                let color = Self::series_color(s);
                let bars: Vec<Bar> = (0..series.values.len())
                    .map(|i| {
                        Bar::new(i as f64, series.values[i])
                            .width(chart.bar_width)
                            .base_offset(series.base(i))
                            .name(format!("{} {}", series.label, chart.categories[i]))
                            .fill(color)
                    })
                    .collect();
                BarChart::new(bars).color(color).name(&series.label)
            })
            .collect()
    }

    /// Whisker and cap segments, three polylines per error bar.
    pub fn whisker_segments(chart: &StackedBarChart) -> Vec<[[f64; 2]; 2]> {
        let cap = chart.bar_width * CAP_FRACTION;
        layout::error_bars(chart)
            .iter()
            .flat_map(|w| {
                [
                    [[w.x, w.low], [w.x, w.high]],
                    [[w.x - cap, w.low], [w.x + cap, w.low]],
                    [[w.x - cap, w.high], [w.x + cap, w.high]],
                ]
            })
            .collect()
    }

    pub fn draw_stacked_bar_chart(ui: &mut egui::Ui, chart: &StackedBarChart, height: f32) {
        if let Some(title) = &chart.title {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(title).size(18.0).strong());
            });
            ui.add_space(6.0);
        }

        let labels = chart.clone();
        let mut plot = Plot::new("stacked_bar_chart")
            .height(height)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| layout::tick_label(&labels, mark.value));
        if chart.show_legend {
            plot = plot.legend(Legend::default());
        }
        if let Some(y_label) = &chart.y_label {
            plot = plot.y_axis_label(y_label.clone());
        }
        if let Some(x_label) = &chart.x_label {
            plot = plot.x_axis_label(x_label.clone());
        }
        let (y_min, y_max) = layout::value_range(chart);

        plot.include_y(y_min).include_y(y_max).show(ui, |plot_ui| {
            for bars in Self::bar_charts(chart) {
                plot_ui.bar_chart(bars);
            }
            for segment in Self::whisker_segments(chart) {
                plot_ui.line(
                    Line::new(PlotPoints::from(segment.to_vec()))
                        .color(Color32::BLACK)
                        .width(1.2),
                );
            }
        });
    }
}
