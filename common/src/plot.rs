use core::fmt::Debug;
use std::path::{Path, PathBuf};

use dyn_clone::{DynClone, clone_trait_object};
use eyre::{Context, Result};
use futures::future::join_all;
use regex::Regex;
use tokio::fs::create_dir_all;
use tracing::{debug, info};

use crate::{config::Settings, palette::Palette, results::ResultsDocument};

#[typetag::serde(tag = "type")]
#[async_trait::async_trait]
pub trait Plot: Debug + DynClone + Send + Sync {
    fn name(&self) -> &'static str;
    /// Identifiers of every chart this plot renders for `results`, before filtering
    fn chart_ids(&self, results: &ResultsDocument) -> Result<Vec<String>>;
    /// Renders the charts
    ///
    /// Arguments:
    /// * `results` - Parsed results file
    /// * `palette` - Framework colors and line styles
    /// * `plot_path` - Output directory, ie. out
    /// * `settings` - The settings from the config
    /// * `filter` - Chart ids to render
    ///
    /// Returns the files written
    async fn plot(
        &self,
        results: &ResultsDocument,
        palette: &Palette,
        plot_path: &Path,
        settings: &Settings,
        filter: &ChartFilter,
    ) -> Result<Vec<PathBuf>>;
}
clone_trait_object!(Plot);

/// Optional regex over chart ids; everything passes without one
#[derive(Debug, Clone, Default)]
pub struct ChartFilter(Option<Regex>);

impl ChartFilter {
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let regex = pattern
            .map(|p| Regex::new(p).context(format!("Parse chart filter {p}")))
            .transpose()?;
        Ok(Self(regex))
    }

    pub fn allows(&self, chart_id: &str) -> bool {
        self.0.as_ref().is_none_or(|r| r.is_match(chart_id))
    }
}

pub async fn ensure_plot_dirs(dirs: &[PathBuf]) -> Result<()> {
    let create_jobs = dirs.iter().map(create_dir_all);
    for res in join_all(create_jobs).await {
        res?;
    }
    Ok(())
}

/// Runs every plot one after another
pub async fn plot(
    plots: &[Box<dyn Plot>],
    results: &ResultsDocument,
    plot_path: &Path,
    settings: &Settings,
    filter: &ChartFilter,
) -> Result<Vec<PathBuf>> {
    if plots.is_empty() {
        debug!("No plots");
        return Ok(Vec::new());
    }

    let palette = Palette::from_frameworks(&results.frameworks)?;
    ensure_plot_dirs(&[plot_path.to_path_buf()])
        .await
        .context("Create plot dir")?;

    let mut written = Vec::new();
    for plot in plots {
        let files = plot
            .plot(results, &palette, plot_path, settings, filter)
            .await
            .context(format!("Plot {plot:?}"))?;
        for file in &files {
            info!("Saved chart to {}", file.display());
        }
        written.extend(files);
    }
    Ok(written)
}
