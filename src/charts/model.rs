//! Stacked Bar Chart Model
//! Typed description of a bar figure, independent of the drawing backend.

use serde::Serialize;
use thiserror::Error;

/// matplotlib's default bar width
pub const DEFAULT_BAR_WIDTH: f64 = 0.8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Series '{series}': {field} has {found} entries, expected {expected}")]
    LengthMismatch {
        series: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Series '{series}': {field}[{index}] is not a finite number")]
    NonFinite {
        series: String,
        field: &'static str,
        index: usize,
    },
    #[error("Series '{series}': error bar {index} is negative")]
    NegativeError { series: String, index: usize },
    #[error("Bar width must be a positive number, got {0}")]
    InvalidWidth(f64),
    #[error("Chart has no categories")]
    NoCategories,
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// One call to `bar`: a row of bars, optionally raised on `bottom`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub errors: Option<Vec<f64>>,
    pub bottom: Option<Vec<f64>>,
}

impl BarSeries {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
            errors: None,
            bottom: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<f64>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_bottom(mut self, bottom: Vec<f64>) -> Self {
        self.bottom = Some(bottom);
        self
    }

    /// Base of bar `i`.
    pub fn base(&self, i: usize) -> f64 {
        self.bottom
            .as_ref()
            .and_then(|b| b.get(i).copied())
            .unwrap_or(0.0)
    }

    /// Top edge of bar `i`, which is where its error bar is centred.
    pub fn top(&self, i: usize) -> f64 {
        self.base(i) + self.values.get(i).copied().unwrap_or(0.0)
    }

    pub fn error(&self, i: usize) -> f64 {
        self.errors
            .as_ref()
            .and_then(|e| e.get(i).copied())
            .unwrap_or(0.0)
    }

    fn validate(&self, expected: usize) -> Result<(), ChartError> {
        let fields: [(&'static str, Option<&Vec<f64>>); 3] = [
            ("values", Some(&self.values)),
            ("yerr", self.errors.as_ref()),
            ("bottom", self.bottom.as_ref()),
        ];

        for (field, data) in fields {
            let Some(data) = data else { continue };
            if data.len() != expected {
                return Err(ChartError::LengthMismatch {
                    series: self.label.clone(),
                    field,
                    expected,
                    found: data.len(),
                });
            }
            if let Some(index) = data.iter().position(|v| !v.is_finite()) {
                return Err(ChartError::NonFinite {
                    series: self.label.clone(),
                    field,
                    index,
                });
            }
        }

        if let Some(errors) = &self.errors {
            if let Some(index) = errors.iter().position(|&e| e < 0.0) {
                return Err(ChartError::NegativeError {
                    series: self.label.clone(),
                    index,
                });
            }
        }
        Ok(())
    }
}

/// A categorical bar figure with one or more (possibly stacked) series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBarChart {
    pub categories: Vec<String>,
    pub bar_width: f64,
    pub series: Vec<BarSeries>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub title: Option<String>,
    pub show_legend: bool,
}

impl StackedBarChart {
    pub fn new<S: Into<String>>(categories: impl IntoIterator<Item = S>) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            bar_width: DEFAULT_BAR_WIDTH,
            series: Vec::new(),
            x_label: None,
            y_label: None,
            title: None,
            show_legend: false,
        }
    }

    pub fn bar_width(mut self, width: f64) -> Self {
        self.bar_width = width;
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    /// Add a series, checking it against the categories first.
    pub fn push_series(&mut self, series: BarSeries) -> Result<(), ChartError> {
        series.validate(self.categories.len())?;
        self.series.push(series);
        Ok(())
    }

    pub fn with_series(mut self, series: BarSeries) -> Result<Self, ChartError> {
        self.push_series(series)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Labels shown in the legend, in drawing order. Empty if the legend is off.
    pub fn legend_entries(&self) -> Vec<&str> {
        if !self.show_legend {
            return Vec::new();
        }
        self.series
            .iter()
            .filter(|s| !s.label.is_empty() && !s.label.starts_with('_'))
            .map(|s| s.label.as_str())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.is_empty() {
            return Err(ChartError::NoCategories);
        }
        if !(self.bar_width.is_finite() && self.bar_width > 0.0) {
            return Err(ChartError::InvalidWidth(self.bar_width));
        }
        for series in &self.series {
            series.validate(self.categories.len())?;
        }
        Ok(())
    }
}
