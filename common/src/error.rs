use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Framework {0} has results but is not listed in frameworks")]
    UnknownFramework(String),
    #[error("Unsupported color {0}")]
    InvalidColor(String),
    #[error("Unknown chart {0}")]
    UnknownChart(String),
    #[error("Maximum {max} needs more than 1000 y ticks at step {step}")]
    TooManyTicks { max: f64, step: u32 },
}
