use std::path::Path;

use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use tokio::fs::read_to_string;

use crate::results::ResultsDocument;

pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path)
        .await
        .context(format!("Reading {}", path.display()))?;
    serde_json::from_str(&content).context(format!("Parsing {}", path.display()))
}

pub async fn read_results(path: &Path) -> Result<ResultsDocument> {
    read_json_file(path).await
}

/// File name for a chart about one project, ie. `VendingMachine_ContainerSize.png`
pub fn project_chart_filename(project: &str, metric: &str) -> String {
    format!("{}_{}.png", project.replace(' ', ""), metric.replace(' ', ""))
}
