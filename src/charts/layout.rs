//! Bar geometry in data coordinates.
//! Category `i` is centred on x = i, like matplotlib's categorical axis.

use crate::charts::StackedBarChart;

/// Headroom added above the tallest whisker.
const Y_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub series: usize,
    pub category: usize,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorWhisker {
    pub series: usize,
    pub category: usize,
    pub x: f64,
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

pub fn bar_rects(chart: &StackedBarChart) -> Vec<BarRect> {
    let half = chart.bar_width / 2.0;
    chart
        .series
        .iter()
        .enumerate()
        .flat_map(|(s, series)| {
            (0..series.values.len()).map(move |i| {
                let base = series.base(i);
                BarRect {
                    series: s,
                    category: i,
                    x0: i as f64 - half,
                    x1: i as f64 + half,
                    y0: base.min(series.top(i)),
                    y1: base.max(series.top(i)),
                }
            })
        })
        .collect()
}

/// Whiskers for every series that carries error values.
pub fn error_bars(chart: &StackedBarChart) -> Vec<ErrorWhisker> {
    chart
        .series
        .iter()
        .enumerate()
        .filter(|(_, series)| series.errors.is_some())
        .flat_map(|(s, series)| {
            (0..series.values.len()).map(move |i| {
                let mid = series.top(i);
                let err = series.error(i);
                ErrorWhisker {
                    series: s,
                    category: i,
                    x: i as f64,
                    low: mid - err,
                    mid,
                    high: mid + err,
                }
            })
        })
        .collect()
}

/// Y range covering bars and whiskers; always includes zero.
pub fn value_range(chart: &StackedBarChart) -> (f64, f64) {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    for rect in bar_rects(chart) {
        min = min.min(rect.y0);
        max = max.max(rect.y1);
    }
    for whisker in error_bars(chart) {
        min = min.min(whisker.low);
        max = max.max(whisker.high);
    }
    if max - min <= f64::EPSILON {
        return (0.0, 1.0);
    }
    let pad = (max - min) * Y_MARGIN;
    let lo = if min < 0.0 { min - pad } else { 0.0 };
    let hi = if max > 0.0 { max + pad } else { 0.0 };
    (lo, hi)
}

/// X range with half a slot of padding on each side.
pub fn category_range(chart: &StackedBarChart) -> (f64, f64) {
    let n = chart.len().max(1) as f64;
    let pad = (chart.bar_width / 2.0).max(0.5);
    (-pad, n - 1.0 + pad)
}

/// Category label for an axis tick, or an empty string between categories.
pub fn tick_label(chart: &StackedBarChart, x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    chart
        .categories
        .get(idx as usize)
        .cloned()
        .unwrap_or_default()
}
