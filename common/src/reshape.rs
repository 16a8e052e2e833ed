use itertools::Itertools;
use serde::Serialize;

use crate::results::ProjectResult;

/// One framework's local result across every project that reported it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalSeries {
    pub framework_name: String,
    pub project_names: Vec<String>,
    pub values: Vec<f64>,
}

/// Synthetic project holding the local results of all projects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedProject {
    pub name: String,
    pub tests_local: Option<Vec<LocalSeries>>,
}

/// Regroups `tests_local` from per project to per framework, keeping project order.
///
/// Frameworks appear in the order they are first seen. A framework absent from a
/// project has no entry for it. `tests_local` is `None` when no project has local results.
pub fn extract_local_test_results(projects: &[ProjectResult]) -> CombinedProject {
    let mut series: Vec<LocalSeries> = Vec::new();
    let mut any_local = false;

    for project in projects {
        let Some(results) = &project.tests_local else {
            continue;
        };
        any_local = true;

        for result in results {
            let idx = match series
                .iter()
                .position(|s| s.framework_name == result.framework_name)
            {
                Some(idx) => idx,
                None => {
                    series.push(LocalSeries {
                        framework_name: result.framework_name.clone(),
                        project_names: Vec::new(),
                        values: Vec::new(),
                    });
                    series.len() - 1
                }
            };
            series[idx].project_names.push(project.name.clone());
            series[idx].values.push(result.result);
        }
    }

    CombinedProject {
        name: projects.iter().map(|p| p.name.as_str()).join(" "),
        tests_local: any_local.then_some(series),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::results::LocalResult;

    fn project(name: &str, local: Option<&[(&str, f64)]>) -> ProjectResult {
        ProjectResult {
            name: name.to_owned(),
            tests_docker: None,
            tests_hardware: None,
            tests_local: local.map(|items| {
                items
                    .iter()
                    .map(|(framework, result)| LocalResult {
                        framework_name: (*framework).to_owned(),
                        result: *result,
                    })
                    .collect()
            }),
        }
    }

    #[test]
    fn groups_by_framework_in_project_order() {
        let projects = vec![
            project("Vending Machine", Some(&[("Hardhat", 2.0), ("Truffle", 5.0)])),
            project("BBSE Bank", Some(&[("Truffle", 9.0), ("Hardhat", 3.0)])),
        ];
        let combined = extract_local_test_results(&projects);

        assert_eq!(combined.name, "Vending Machine BBSE Bank");
        assert_eq!(
            combined.tests_local.unwrap(),
            vec![
                LocalSeries {
                    framework_name: "Hardhat".to_owned(),
                    project_names: vec!["Vending Machine".to_owned(), "BBSE Bank".to_owned()],
                    values: vec![2.0, 3.0],
                },
                LocalSeries {
                    framework_name: "Truffle".to_owned(),
                    project_names: vec!["Vending Machine".to_owned(), "BBSE Bank".to_owned()],
                    values: vec![5.0, 9.0],
                },
            ]
        );
    }

    #[test]
    fn missing_framework_is_not_gap_filled() {
        let projects = vec![
            project("A", Some(&[("Hardhat", 1.0)])),
            project("B", Some(&[("Hardhat", 1.5), ("Foundry", 0.5)])),
            project("C", Some(&[("Hardhat", 2.0)])),
        ];
        let series = extract_local_test_results(&projects).tests_local.unwrap();

        assert_eq!(series[0].project_names, vec!["A", "B", "C"]);
        assert_eq!(series[1].framework_name, "Foundry");
        assert_eq!(series[1].project_names, vec!["B"]);
        assert_eq!(series[1].values, vec![0.5]);
        for s in &series {
            assert_eq!(s.project_names.len(), s.values.len());
        }
    }

    #[test]
    fn projects_without_local_results_are_skipped() {
        let projects = vec![
            project("A", None),
            project("B", Some(&[("Hardhat", 4.0)])),
        ];
        let combined = extract_local_test_results(&projects);
        assert_eq!(combined.name, "A B");
        assert_eq!(combined.tests_local.unwrap()[0].project_names, vec!["B"]);
    }

    #[test]
    fn no_local_results_at_all() {
        let projects = vec![project("A", None), project("B", None)];
        assert!(extract_local_test_results(&projects).tests_local.is_none());
    }
}
