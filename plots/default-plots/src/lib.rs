//! Links every plot crate so its `typetag` registration is available when parsing configs.

use common::plot::Plot;
use tracing::debug;

pub use descriptor_charts::DescriptorCharts;
pub use project_metrics::ProjectMetrics;

/// Crate names of the plots, used to build log filters
pub const PLOT_CRATES: &[&str] = &["descriptor_charts", "project_metrics"];

/// Every plot with its default configuration
pub fn default_plots() -> Vec<Box<dyn Plot>> {
    vec![
        Box::new(DescriptorCharts::default()),
        Box::new(ProjectMetrics::default()),
    ]
}

pub fn init_plots() {
    for plot in default_plots() {
        match serde_json::to_string(&plot) {
            Ok(registered) => debug!("Registered plot {registered}"),
            Err(err) => debug!("Plot {plot:?} does not serialize: {err}"),
        }
    }
}
