use std::ops::Range;

use plotters::coord::{
    ranged1d::{DefaultFormatting, KeyPointHint, Ranged},
    types::RangedCoordf64,
};

use crate::{
    descriptor::ChartDescriptor,
    error::ChartError,
    panel::{Panel, XScale, running_max},
};

/// A linear f64 axis whose ticks are exactly the given values
#[derive(Debug, Clone)]
pub struct TickAxis {
    range: Range<f64>,
    ticks: Vec<f64>,
}

impl TickAxis {
    /// Ticks outside `range` are dropped
    pub fn new(range: Range<f64>, ticks: Vec<f64>) -> Self {
        let ticks = ticks
            .into_iter()
            .filter(|tick| range.start <= *tick && *tick <= range.end)
            .collect();
        Self { range, ticks }
    }

    /// The shared y axis of every panel of `descriptor`
    pub fn y_axis(descriptor: &ChartDescriptor, panels: &[Panel]) -> Result<Self, ChartError> {
        let max = running_max(panels);
        let ticks = descriptor.y_ticks.ticks(max)?;
        Ok(Self::new(0.0..descriptor.y_ticks.axis_top(max), ticks))
    }

    pub fn x_axis(scale: &XScale) -> Self {
        let (min, max) = scale.bounds();
        Self::new(min..max, scale.ticks())
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }
}

impl Ranged for TickAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        RangedCoordf64::from(self.range.clone()).map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}
