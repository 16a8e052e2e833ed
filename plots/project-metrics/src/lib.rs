use std::path::{Path, PathBuf};

use common::{
    chart::{ChartJob, render_chart},
    config::Settings,
    descriptor::{
        Anchor, Annotation, ChartDescriptor, DockerMetric, HAlign, Placement, TestType, TickRule,
    },
    palette::Palette,
    plot::{ChartFilter, Plot},
    results::{ProjectResult, ResultsDocument},
    util::project_chart_filename,
};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One single-panel chart per project and docker metric
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProjectMetrics {
    /// Metrics to chart, both when omitted
    pub metrics: Option<Vec<DockerMetric>>,
}

impl ProjectMetrics {
    fn metrics(&self) -> Vec<DockerMetric> {
        self.metrics
            .clone()
            .unwrap_or_else(|| DockerMetric::ALL.to_vec())
    }

    /// (metric, project) pairs that have docker results
    fn jobs<'a>(&self, results: &'a ResultsDocument) -> Vec<(DockerMetric, &'a ProjectResult)> {
        self.metrics()
            .into_iter()
            .flat_map(|metric| {
                results
                    .projects
                    .iter()
                    .filter(|project| project.tests_docker.is_some())
                    .map(move |project| (metric, project))
            })
            .collect()
    }
}

pub fn chart_id(project: &ProjectResult, metric: DockerMetric) -> String {
    project_chart_filename(&project.name, metric.name())
        .trim_end_matches(".png")
        .to_owned()
}

pub fn metric_descriptor(project: &ProjectResult, metric: DockerMetric) -> ChartDescriptor {
    ChartDescriptor {
        id: chart_id(project, metric),
        title: format!("{}s", metric.name()),
        fig_size: (8.0, 5.0),
        x_label: "Docker Container Version".to_owned(),
        y_label: format!("{} ({})", metric.name(), metric.unit()),
        test_type: TestType::Docker { metric },
        only_last_project: false,
        marker_size: 6,
        annotation: Annotation {
            font_size: 7.0,
            rotation: 0.0,
            format: metric.box_format(),
            placement: Placement::uniform(Anchor::new(HAlign::Left, 8.0, 2.0)),
            slowdown_included: false,
        },
        y_ticks: match metric {
            DockerMetric::ExecutionTimeSeconds => TickRule::new(1, 1.0, 2.0),
            DockerMetric::ContainerSizeMb => TickRule::new(100, 1.0, 2.0),
        },
        x_ticks_rotation: 0.0,
        y_ticks_rotation: 0.0,
    }
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for ProjectMetrics {
    fn name(&self) -> &'static str {
        "ProjectMetrics"
    }

    fn chart_ids(&self, results: &ResultsDocument) -> Result<Vec<String>> {
        Ok(self
            .jobs(results)
            .into_iter()
            .map(|(metric, project)| chart_id(project, metric))
            .collect())
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
        for (metric, project) in self.jobs(results) {
            let descriptor = metric_descriptor(project, metric);
            if !filter.allows(&descriptor.id) {
                debug!("{} filtered out", descriptor.id);
                continue;
            }
            let Some(panel) = descriptor.test_type.panel(project) else {
                continue;
            };

            let job = ChartJob {
                filepath: plot_path.join(project_chart_filename(&project.name, metric.name())),
                descriptor: &descriptor,
                panels: vec![panel],
            };
            render_chart(&job, palette, settings).context(format!("Render {}", descriptor.id))?;
            written.push(job.filepath);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use common::results::{DockerPoint, DockerSeries, Framework, LineStyle};
    use pretty_assertions::assert_eq;

    use super::*;

    fn project(name: &str, docker: bool) -> ProjectResult {
        ProjectResult {
            name: name.to_owned(),
            tests_docker: docker.then(|| {
                vec![DockerSeries {
                    framework_name: "Hardhat".to_owned(),
                    data: vec![DockerPoint {
                        id: "node:18".to_owned(),
                        execution_time_seconds: Some(3.0),
                        container_size_mb: Some(480.0),
                        disabled: false,
                    }],
                }]
            }),
            tests_hardware: None,
            tests_local: None,
        }
    }

    fn results() -> ResultsDocument {
        ResultsDocument {
            frameworks: Vec::new(),
            projects: vec![
                project("Vending Machine", true),
                project("Local Only", false),
                project("BBSE Bank", true),
            ],
        }
    }

    #[test]
    fn ids_per_metric_and_project() {
        let ids = ProjectMetrics::default().chart_ids(&results()).unwrap();
        assert_eq!(
            ids,
            vec![
                "VendingMachine_TestExecutionTime",
                "BBSEBank_TestExecutionTime",
                "VendingMachine_ContainerSize",
                "BBSEBank_ContainerSize",
            ]
        );

        let sizes = ProjectMetrics {
            metrics: Some(vec![DockerMetric::ContainerSizeMb]),
        };
        assert_eq!(sizes.chart_ids(&results()).unwrap().len(), 2);
    }

    #[test]
    fn descriptor_labels() {
        let descriptor =
            metric_descriptor(&project("Vending Machine", true), DockerMetric::ContainerSizeMb);
        assert_eq!(descriptor.y_label, "Container Size (MB)");
        assert_eq!(
            descriptor.caption("Vending Machine"),
            "Vending Machine - Container Sizes (Lower is better!)"
        );
        assert_eq!(descriptor.filename(), "VendingMachine_ContainerSize.png");
        assert_eq!(descriptor.y_ticks.ticks(480.0).unwrap(), vec![100.0, 200.0, 300.0, 400.0]);
        assert_eq!(descriptor.annotation.texts(&[480.0]), vec!["480.0 MB".to_owned()]);
    }

    #[tokio::test]
    async fn filter_excluding_everything_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let filter = ChartFilter::new(Some("^Nothing$")).unwrap();
        let written = ProjectMetrics::default()
            .plot(
                &results(),
                &Palette::default(),
                dir.path(),
                &Settings::default(),
                &filter,
            )
            .await
            .unwrap();
        assert!(written.is_empty());
    }

    #[tokio::test]
    async fn writes_one_chart_per_project_and_metric() {
        let dir = tempfile::tempdir().unwrap();
        let mut results = results();
        results.frameworks.push(Framework {
            name: "Hardhat".to_owned(),
            color: "#f0c419".to_owned(),
            linestyle: LineStyle::Solid,
        });
        let palette = Palette::from_frameworks(&results.frameworks).unwrap();

        let written = ProjectMetrics::default()
            .plot(
                &results,
                &palette,
                dir.path(),
                &Settings::default(),
                &ChartFilter::default(),
            )
            .await
            .unwrap();

        let names = written
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "VendingMachine_TestExecutionTime.png",
                "BBSEBank_TestExecutionTime.png",
                "VendingMachine_ContainerSize.png",
                "BBSEBank_ContainerSize.png",
            ]
        );
        for path in &written {
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
        assert!(!dir.path().join("LocalOnly_ContainerSize.png").exists());
    }
}
