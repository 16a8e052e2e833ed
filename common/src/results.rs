use serde::{Deserialize, Serialize};

/// Parsed `results.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub frameworks: Vec<Framework>,
    pub projects: Vec<ProjectResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub linestyle: LineStyle,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    #[serde(alias = "-")]
    Solid,
    #[serde(alias = "--")]
    Dashed,
    #[serde(alias = ":")]
    Dotted,
    #[serde(alias = "-.")]
    DashDot,
}

/// A project and every test type that was run against it. A missing test type is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResult {
    pub name: String,
    #[serde(default)]
    pub tests_docker: Option<Vec<DockerSeries>>,
    #[serde(default)]
    pub tests_hardware: Option<Vec<HardwareSeries>>,
    #[serde(default)]
    pub tests_local: Option<Vec<LocalResult>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerSeries {
    pub framework_name: String,
    pub data: Vec<DockerPoint>,
}

/// One docker image tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerPoint {
    pub id: String,
    #[serde(default)]
    pub execution_time_seconds: Option<f64>,
    #[serde(default)]
    pub container_size_mb: Option<f64>,
    #[serde(default)]
    pub disabled: bool,
}

/// Test execution time per number of CPUs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSeries {
    pub framework_name: String,
    pub cpus: Vec<f64>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalResult {
    pub framework_name: String,
    pub result: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_test_types_are_none() {
        let project: ProjectResult = serde_json::from_str(
            r#"{"name": "Vending Machine", "tests_docker": null, "tests_local": [
                {"framework_name": "Hardhat", "result": 3.5}
            ]}"#,
        )
        .unwrap();
        assert!(project.tests_docker.is_none());
        assert!(project.tests_hardware.is_none());
        assert_eq!(project.tests_local.unwrap()[0].result, 3.5);
    }

    #[test]
    fn linestyle_accepts_matplotlib_short_forms() {
        let styles: Vec<LineStyle> =
            serde_json::from_str(r#"["-", "--", ":", "-.", "dashed"]"#).unwrap();
        assert_eq!(
            styles,
            vec![
                LineStyle::Solid,
                LineStyle::Dashed,
                LineStyle::Dotted,
                LineStyle::DashDot,
                LineStyle::Dashed
            ]
        );
    }

    #[test]
    fn docker_point_defaults() {
        let point: DockerPoint = serde_json::from_str(r#"{"id": "node:18"}"#).unwrap();
        assert!(!point.disabled);
        assert!(point.execution_time_seconds.is_none());
        assert!(point.container_size_mb.is_none());
    }
}
