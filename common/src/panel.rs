use itertools::Itertools;
use tracing::{debug, warn};

use crate::{
    descriptor::{ChartDescriptor, DockerMetric, TestType},
    reshape::{CombinedProject, extract_local_test_results},
    results::{ProjectResult, ResultsDocument},
};

#[derive(Debug, Clone, PartialEq)]
pub enum XValue {
    Label(String),
    Number(f64),
}

impl XValue {
    pub fn label(&self) -> String {
        match self {
            XValue::Label(label) => label.clone(),
            XValue::Number(number) => format!("{number}"),
        }
    }
}

/// One framework's retained points within a panel
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub framework_name: String,
    pub points: Vec<(XValue, f64)>,
}

impl Series {
    /// Pairs x with y, dropping every position whose y is missing
    pub fn new(framework_name: &str, xs: Vec<XValue>, ys: Vec<Option<f64>>) -> Self {
        Self {
            framework_name: framework_name.to_owned(),
            points: xs
                .into_iter()
                .zip(ys)
                .filter_map(|(x, y)| y.map(|y| (x, y)))
                .collect(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, y)| *y).collect()
    }
}

/// One subplot, one project
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub name: String,
    pub series: Vec<Series>,
}

/// Horizontal axis of a panel
#[derive(Debug, Clone, PartialEq)]
pub enum XScale {
    /// Observed numeric x values, sorted and deduplicated
    Numeric(Vec<f64>),
    /// Labels in order of first appearance, placed at 0, 1, 2...
    Categorical(Vec<String>),
}

impl XScale {
    pub fn of(panel: &Panel) -> Self {
        let xs = panel
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(x, _)| x))
            .collect::<Vec<_>>();

        if !xs.is_empty() && xs.iter().all(|x| matches!(x, XValue::Number(_))) {
            let mut numbers = xs
                .iter()
                .filter_map(|x| match x {
                    XValue::Number(n) => Some(*n),
                    XValue::Label(_) => None,
                })
                .collect::<Vec<_>>();
            numbers.sort_by(f64::total_cmp);
            numbers.dedup();
            XScale::Numeric(numbers)
        } else {
            XScale::Categorical(xs.iter().map(|x| x.label()).unique().collect())
        }
    }

    pub fn position(&self, x: &XValue) -> f64 {
        match (self, x) {
            (XScale::Numeric(_), XValue::Number(n)) => *n,
            (XScale::Categorical(labels), x) => {
                let label = x.label();
                labels
                    .iter()
                    .position(|l| *l == label)
                    .map(|idx| idx as f64)
                    .unwrap_or(0.0)
            }
            (XScale::Numeric(_), XValue::Label(_)) => 0.0,
        }
    }

    /// Tick positions: every observed number, or every category
    pub fn ticks(&self) -> Vec<f64> {
        match self {
            XScale::Numeric(numbers) => numbers.clone(),
            XScale::Categorical(labels) => (0..labels.len()).map(|idx| idx as f64).collect(),
        }
    }

    pub fn tick_label(&self, position: f64) -> String {
        match self {
            XScale::Numeric(_) => format!("{position}"),
            XScale::Categorical(labels) => {
                let rounded = position.round();
                if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                labels.get(rounded as usize).cloned().unwrap_or_default()
            }
        }
    }

    /// Padded axis range
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            XScale::Numeric(numbers) => match (numbers.first(), numbers.last()) {
                (Some(&min), Some(&max)) => {
                    let pad = ((max - min) * 0.05).max(0.5);
                    (min - pad, max + pad)
                }
                _ => (0.0, 1.0),
            },
            XScale::Categorical(labels) => (-0.5, labels.len().max(1) as f64 - 0.5),
        }
    }
}

/// Plain maximum of every retained y across the panels, starting from zero
pub fn running_max(panels: &[Panel]) -> f64 {
    panels
        .iter()
        .flat_map(|p| p.series.iter())
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .fold(0.0, f64::max)
}

fn docker_panel(project: &ProjectResult, metric: DockerMetric) -> Option<Panel> {
    let results = project.tests_docker.as_ref()?;
    Some(Panel {
        name: project.name.clone(),
        series: results
            .iter()
            .map(|result| {
                let data = result.data.iter().filter(|item| !item.disabled);
                Series::new(
                    &result.framework_name,
                    data.clone().map(|item| XValue::Label(item.id.clone())).collect(),
                    data.map(|item| metric.value(item)).collect(),
                )
            })
            .collect(),
    })
}

fn hardware_panel(project: &ProjectResult) -> Option<Panel> {
    let results = project.tests_hardware.as_ref()?;
    Some(Panel {
        name: project.name.clone(),
        series: results
            .iter()
            .map(|result| {
                Series::new(
                    &result.framework_name,
                    result.cpus.iter().map(|cpus| XValue::Number(*cpus)).collect(),
                    result.values.clone(),
                )
            })
            .collect(),
    })
}

fn local_panel(project: &CombinedProject) -> Option<Panel> {
    let results = project.tests_local.as_ref()?;
    Some(Panel {
        name: project.name.clone(),
        series: results
            .iter()
            .map(|result| {
                Series::new(
                    &result.framework_name,
                    result
                        .project_names
                        .iter()
                        .map(|name| XValue::Label(name.clone()))
                        .collect(),
                    result.values.iter().map(|v| Some(*v)).collect(),
                )
            })
            .collect(),
    })
}

impl TestType {
    /// Panel for a single project, `None` when the project did not run this test type.
    /// `local` reads the project's own local results as a one-project combination.
    pub fn panel(&self, project: &ProjectResult) -> Option<Panel> {
        match self {
            TestType::Docker { metric } => docker_panel(project, *metric),
            TestType::Hardware => hardware_panel(project),
            TestType::Local => local_panel(&extract_local_test_results(std::slice::from_ref(
                project,
            ))),
        }
    }
}

/// Picks the panels a descriptor renders.
///
/// `None` means the descriptor is skipped: no project selected, or the first selected
/// project has no data for the test type. Later projects without data become empty panels.
pub fn select_panels(descriptor: &ChartDescriptor, results: &ResultsDocument) -> Option<Vec<Panel>> {
    if descriptor.test_type == TestType::Local {
        let combined = extract_local_test_results(&results.projects);
        let Some(panel) = local_panel(&combined) else {
            debug!("Skipping {}: no local results", descriptor.id);
            return None;
        };
        return Some(vec![panel]);
    }

    let selected: &[ProjectResult] = if descriptor.only_last_project {
        match results.projects.split_last() {
            Some((last, _)) => std::slice::from_ref(last),
            None => &[],
        }
    } else {
        &results.projects
    };

    let first = selected.first()?;
    if descriptor.test_type.panel(first).is_none() {
        debug!(
            "Skipping {}: {} has no {:?} results",
            descriptor.id, first.name, descriptor.test_type
        );
        return None;
    }

    Some(
        selected
            .iter()
            .map(|project| {
                descriptor.test_type.panel(project).unwrap_or_else(|| {
                    warn!(
                        "{} has no {:?} results, leaving its {} panel empty",
                        project.name, descriptor.test_type, descriptor.id
                    );
                    Panel {
                        name: project.name.clone(),
                        series: Vec::new(),
                    }
                })
            })
            .collect(),
    )
}
