pub mod axis;
pub mod chart;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod palette;
pub mod panel;
pub mod plot;
pub mod reshape;
pub mod results;
pub mod util;

/// Font and marker sizes are given in points, 72 to the inch
pub const POINTS_PER_INCH: f64 = 72.0;
