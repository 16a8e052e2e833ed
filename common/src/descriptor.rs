use serde::{Deserialize, Serialize};

use crate::{error::ChartError, results::DockerPoint};

/// Docker measurement projected onto the y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockerMetric {
    ExecutionTimeSeconds,
    ContainerSizeMb,
}

impl DockerMetric {
    pub const ALL: [DockerMetric; 2] = [
        DockerMetric::ExecutionTimeSeconds,
        DockerMetric::ContainerSizeMb,
    ];

    pub fn value(&self, point: &DockerPoint) -> Option<f64> {
        match self {
            DockerMetric::ExecutionTimeSeconds => point.execution_time_seconds,
            DockerMetric::ContainerSizeMb => point.container_size_mb,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DockerMetric::ExecutionTimeSeconds => "Test Execution Time",
            DockerMetric::ContainerSizeMb => "Container Size",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            DockerMetric::ExecutionTimeSeconds => "Seconds",
            DockerMetric::ContainerSizeMb => "MB",
        }
    }

    pub fn box_format(&self) -> BoxFormat {
        match self {
            DockerMetric::ExecutionTimeSeconds => BoxFormat::new(Some(2), "s"),
            DockerMetric::ContainerSizeMb => BoxFormat::new(None, " MB"),
        }
    }
}

/// Selects which part of a project a chart reads and how its x/y values are extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "test_type", rename_all = "lowercase")]
pub enum TestType {
    Docker { metric: DockerMetric },
    Hardware,
    Local,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Where an annotation box sits relative to its point. Offsets are in points, y up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub align: HAlign,
    pub dx: f64,
    pub dy: f64,
}

impl Anchor {
    pub const fn new(align: HAlign, dx: f64, dy: f64) -> Self {
        Self { align, dx, dy }
    }
}

/// Annotation anchors keyed by the parity of the series index and of the point index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub even_series_even_point: Anchor,
    pub even_series_odd_point: Anchor,
    pub odd_series_even_point: Anchor,
    pub odd_series_odd_point: Anchor,
}

impl Placement {
    pub const fn uniform(anchor: Anchor) -> Self {
        Self {
            even_series_even_point: anchor,
            even_series_odd_point: anchor,
            odd_series_even_point: anchor,
            odd_series_odd_point: anchor,
        }
    }

    pub const fn by_series(even: Anchor, odd: Anchor) -> Self {
        Self {
            even_series_even_point: even,
            even_series_odd_point: even,
            odd_series_even_point: odd,
            odd_series_odd_point: odd,
        }
    }

    pub const fn by_point(even: Anchor, odd: Anchor) -> Self {
        Self {
            even_series_even_point: even,
            even_series_odd_point: odd,
            odd_series_even_point: even,
            odd_series_odd_point: odd,
        }
    }

    pub fn anchor(&self, series_idx: usize, point_idx: usize) -> Anchor {
        match (series_idx % 2 == 0, point_idx % 2 == 0) {
            (true, true) => self.even_series_even_point,
            (true, false) => self.even_series_odd_point,
            (false, true) => self.odd_series_even_point,
            (false, false) => self.odd_series_odd_point,
        }
    }
}

/// Annotation box text: a number with a unit suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxFormat {
    /// Fixed decimals, or the shortest round-tripping representation when `None`
    #[serde(default)]
    pub precision: Option<usize>,
    #[serde(default)]
    pub suffix: String,
}

impl BoxFormat {
    pub fn new(precision: Option<usize>, suffix: &str) -> Self {
        Self {
            precision,
            suffix: suffix.to_owned(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self.precision {
            Some(precision) => format!("{value:.precision$}{}", self.suffix),
            None => format!("{}{}", shortest_repr(value), self.suffix),
        }
    }
}

/// Shortest round-tripping form, exponents written with a sign and two digits (`1e+16`)
fn shortest_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub font_size: f64,
    #[serde(default)]
    pub rotation: f64,
    pub format: BoxFormat,
    pub placement: Placement,
    #[serde(default)]
    pub slowdown_included: bool,
}

impl Annotation {
    /// Box texts for one series of retained values, in order
    pub fn texts(&self, values: &[f64]) -> Vec<String> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let text = self.format.format(value);
                if self.slowdown_included && i > 0 {
                    format!("{text} ({:.2}% slower)", slowdown(values[i - 1], value))
                } else {
                    text
                }
            })
            .collect()
    }
}

/// Percentage change from `previous` to `current`. Negative when `current` is faster.
pub fn slowdown(previous: f64, current: f64) -> f64 {
    (current - previous) / previous * 100.0
}

const MAX_Y_TICKS: i64 = 1000;

/// y ticks every `step` over `[0, trunc(max * scale + margin))`, zero excluded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRule {
    pub step: u32,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub margin: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl TickRule {
    pub const fn new(step: u32, scale: f64, margin: f64) -> Self {
        Self {
            step,
            scale,
            margin,
        }
    }

    /// Exclusive end of the tick range
    pub fn end(&self, max: f64) -> i64 {
        (max * self.scale + self.margin).trunc() as i64
    }

    pub fn ticks(&self, max: f64) -> Result<Vec<f64>, ChartError> {
        let step = self.step.max(1);
        let end = self.end(max);
        if end / i64::from(step) > MAX_Y_TICKS {
            return Err(ChartError::TooManyTicks { max, step });
        }
        Ok((0..end)
            .step_by(step as usize)
            .filter(|&tick| tick != 0)
            .map(|tick| tick as f64)
            .collect())
    }

    /// Top of the y axis, always above every observed value
    pub fn axis_top(&self, max: f64) -> f64 {
        (self.end(max) as f64).max(max * 1.05).max(1.0)
    }
}

/// Static description of one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub id: String,
    pub title: String,
    /// Width and height in inches
    pub fig_size: (f64, f64),
    pub x_label: String,
    pub y_label: String,
    #[serde(flatten)]
    pub test_type: TestType,
    #[serde(default)]
    pub only_last_project: bool,
    /// Marker diameter in points
    pub marker_size: u32,
    pub annotation: Annotation,
    pub y_ticks: TickRule,
    #[serde(default)]
    pub x_ticks_rotation: f64,
    #[serde(default)]
    pub y_ticks_rotation: f64,
}

impl ChartDescriptor {
    pub fn filename(&self) -> String {
        format!("{}.png", self.id.replace(' ', ""))
    }

    /// Caption of a panel showing `panel_name`
    pub fn caption(&self, panel_name: &str) -> String {
        match self.test_type {
            TestType::Local => self.title.clone(),
            _ => format!("{panel_name} - {} (Lower is better!)", self.title),
        }
    }
}

pub fn builtin_descriptors() -> Vec<ChartDescriptor> {
    let docker_placement = Placement::uniform(Anchor::new(HAlign::Left, 8.0, 2.0));
    vec![
        ChartDescriptor {
            id: "TestExecutionTimes".to_owned(),
            title: "Test Execution Times".to_owned(),
            fig_size: (15.0, 5.0),
            x_label: "Docker Container Version".to_owned(),
            y_label: "Test Execution Time (Seconds)".to_owned(),
            test_type: TestType::Docker {
                metric: DockerMetric::ExecutionTimeSeconds,
            },
            only_last_project: false,
            marker_size: 6,
            annotation: Annotation {
                font_size: 7.0,
                rotation: 0.0,
                format: BoxFormat::new(Some(2), "s"),
                placement: docker_placement,
                slowdown_included: false,
            },
            y_ticks: TickRule::new(1, 1.0, 2.0),
            x_ticks_rotation: 0.0,
            y_ticks_rotation: 0.0,
        },
        ChartDescriptor {
            id: "ContainerSizes".to_owned(),
            title: "Container Sizes".to_owned(),
            fig_size: (7.0, 5.0),
            x_label: "Docker Container Version".to_owned(),
            y_label: "Container Size (MB)".to_owned(),
            test_type: TestType::Docker {
                metric: DockerMetric::ContainerSizeMb,
            },
            only_last_project: true,
            marker_size: 6,
            annotation: Annotation {
                font_size: 7.0,
                rotation: 0.0,
                format: BoxFormat::new(None, " MB"),
                placement: docker_placement,
                slowdown_included: false,
            },
            y_ticks: TickRule::new(100, 1.3, 200.0),
            x_ticks_rotation: 0.0,
            y_ticks_rotation: 0.0,
        },
        ChartDescriptor {
            id: "HardwareTests".to_owned(),
            title: "Test Execution Times with Different Number of CPUs".to_owned(),
            fig_size: (10.0, 4.0),
            x_label: "Number of CPUs".to_owned(),
            y_label: "Test Execution Time (Seconds)".to_owned(),
            test_type: TestType::Hardware,
            only_last_project: true,
            marker_size: 8,
            annotation: Annotation {
                font_size: 5.0,
                rotation: 40.0,
                format: BoxFormat::new(Some(2), "s"),
                placement: Placement::by_series(
                    Anchor::new(HAlign::Left, 6.0, 2.0),
                    Anchor::new(HAlign::Center, -6.0, -2.0),
                ),
                slowdown_included: false,
            },
            y_ticks: TickRule::new(5, 1.0, 10.0),
            x_ticks_rotation: 90.0,
            y_ticks_rotation: 0.0,
        },
        ChartDescriptor {
            id: "LocalCompilationTestingTimes".to_owned(),
            title: "Compilation and Testing Times of Different Frameworks".to_owned(),
            fig_size: (8.0, 4.0),
            x_label: "Smart Contract Project".to_owned(),
            y_label: "Compilation and Testing Time (Seconds)".to_owned(),
            test_type: TestType::Local,
            only_last_project: true,
            marker_size: 5,
            annotation: Annotation {
                font_size: 7.0,
                rotation: 0.0,
                format: BoxFormat::new(Some(2), "s"),
                placement: Placement::by_point(
                    Anchor::new(HAlign::Left, 8.0, 4.0),
                    Anchor::new(HAlign::Right, -8.0, -4.0),
                ),
                slowdown_included: true,
            },
            y_ticks: TickRule::new(1, 1.3, 2.0),
            x_ticks_rotation: 0.0,
            y_ticks_rotation: 0.0,
        },
    ]
}

pub fn find_builtin(id: &str) -> Result<ChartDescriptor, ChartError> {
    builtin_descriptors()
        .into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| ChartError::UnknownChart(id.to_owned()))
}
