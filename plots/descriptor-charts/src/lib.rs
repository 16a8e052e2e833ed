use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use common::{
    chart::render_descriptor,
    config::Settings,
    descriptor::{ChartDescriptor, builtin_descriptors, find_builtin},
    palette::Palette,
    plot::{ChartFilter, Plot},
    results::ResultsDocument,
};
use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Multi-panel charts described by [`ChartDescriptor`]s
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DescriptorCharts {
    /// Built-in chart ids to render, all of them when omitted
    pub charts: Option<Vec<String>>,
    /// Additional descriptors rendered after the built-in ones
    #[serde(default)]
    pub custom: Vec<ChartDescriptor>,
}

impl DescriptorCharts {
    pub fn descriptors(&self) -> Result<Vec<ChartDescriptor>> {
        let mut descriptors = match &self.charts {
            Some(ids) => ids
                .iter()
                .map(|id| find_builtin(id))
                .collect::<Result<Vec<_>, _>>()?,
            None => builtin_descriptors(),
        };
        descriptors.extend(self.custom.iter().cloned());

        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.filename()) {
                bail!("Chart {} is listed more than once", descriptor.id);
            }
        }
        Ok(descriptors)
    }
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for DescriptorCharts {
    fn name(&self) -> &'static str {
        "DescriptorCharts"
    }

    fn chart_ids(&self, _results: &ResultsDocument) -> Result<Vec<String>> {
        Ok(self.descriptors()?.into_iter().map(|d| d.id).collect())
    }

    async fn plot(
        &self,
        results: &ResultsDocument,
        palette: &Palette,
        plot_path: &Path,
        settings: &Settings,
        filter: &ChartFilter,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for descriptor in self.descriptors()? {
            if !filter.allows(&descriptor.id) {
                debug!("{} filtered out", descriptor.id);
                continue;
            }
            match render_descriptor(&descriptor, results, palette, plot_path, settings)
                .context(format!("Render {}", descriptor.id))?
            {
                Some(path) => written.push(path),
                None => debug!("Skipped {}", descriptor.id),
            }
        }
        Ok(written)
    }
}
