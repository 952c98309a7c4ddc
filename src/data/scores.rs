//! Scores by group and gender: the literal inputs of the demo slide.

use crate::charts::{BarSeries, ChartError, StackedBarChart};
use serde::Serialize;

pub const TITLE: &str = "Scores broken out by group and gender";
pub const Y_LABEL: &str = "Scores";

/// Five parallel sequences plus the bar width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedScores {
    pub labels: Vec<String>,
    pub men_means: Vec<f64>,
    pub women_means: Vec<f64>,
    pub men_std: Vec<f64>,
    pub women_std: Vec<f64>,
    pub width: f64,
}

impl Default for GroupedScores {
    fn default() -> Self {
        Self {
            labels: ["G1", "G2", "G3", "G4", "G6"].map(String::from).to_vec(),
            men_means: vec![20.0, 35.0, 30.0, 35.0, 27.0],
            women_means: vec![25.0, 32.0, 34.0, 20.0, 25.0],
            men_std: vec![2.0, 3.0, 4.0, 1.0, 2.0],
            women_std: vec![3.0, 5.0, 2.0, 3.0, 3.0],
            width: 0.35,
        }
    }
}

impl GroupedScores {
    /// Women stacked on men, each with its standard deviation as error bars.
    pub fn to_chart(&self) -> Result<StackedBarChart, ChartError> {
        let chart = StackedBarChart::new(self.labels.iter().cloned())
            .bar_width(self.width)
            .y_label(Y_LABEL)
            .title(TITLE)
            .legend(true)
            .with_series(
                BarSeries::new("Men", self.men_means.clone()).with_errors(self.men_std.clone()),
            )?
            .with_series(
                BarSeries::new("Women", self.women_means.clone())
                    .with_errors(self.women_std.clone())
                    .with_bottom(self.men_means.clone()),
            )?;
        chart.validate()?;
        Ok(chart)
    }
}
