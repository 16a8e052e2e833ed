use std::path::Path;

use common::{
    axis::TickAxis,
    chart::render_descriptor,
    config::Settings,
    descriptor::{builtin_descriptors, find_builtin},
    palette::Palette,
    panel::{XValue, running_max, select_panels},
    reshape::extract_local_test_results,
    results::{LineStyle, ResultsDocument},
    util::read_results,
};
use pretty_assertions::assert_eq;

async fn fixture() -> ResultsDocument {
    read_results(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/results.json"))
        .await
        .unwrap()
}

#[tokio::test]
async fn fixture_parses_with_palette() {
    let results = fixture().await;
    assert_eq!(results.projects.len(), 2);
    assert!(results.projects[0].tests_hardware.is_none());

    let palette = Palette::from_frameworks(&results.frameworks).unwrap();
    assert_eq!(palette.style("Truffle").unwrap().linestyle, LineStyle::Dashed);
}

#[tokio::test]
async fn execution_times_panel_per_project() {
    let results = fixture().await;
    let descriptor = find_builtin("TestExecutionTimes").unwrap();
    let panels = select_panels(&descriptor, &results).unwrap();

    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].name, "Vending Machine");

    let hardhat = &panels[0].series[0];
    assert_eq!(hardhat.values(), vec![4.12, 3.87]);
    let truffle = &panels[0].series[1];
    assert_eq!(
        truffle
            .points
            .iter()
            .map(|(x, _)| x.clone())
            .collect::<Vec<_>>(),
        vec![
            XValue::Label("node:16".to_owned()),
            XValue::Label("node:20".to_owned())
        ]
    );

    let max = running_max(&panels);
    assert_eq!(max, 15.3);
    let ticks = descriptor.y_ticks.ticks(max).unwrap();
    assert_eq!(ticks.first(), Some(&1.0));
    assert_eq!(ticks.last(), Some(&16.0));
}

#[tokio::test]
async fn hardware_only_renders_last_project() {
    let results = fixture().await;
    let descriptor = find_builtin("HardwareTests").unwrap();
    let panels = select_panels(&descriptor, &results).unwrap();

    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].name, "BBSE Bank 2.0");
    assert_eq!(panels[0].series[1].values(), vec![38.7, 24.5, 15.8]);
    assert_eq!(
        descriptor.y_ticks.ticks(running_max(&panels)).unwrap(),
        vec![5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0]
    );
}

#[tokio::test]
async fn local_results_with_slowdown() {
    let results = fixture().await;
    let combined = extract_local_test_results(&results.projects);
    assert_eq!(combined.name, "Vending Machine BBSE Bank 2.0");

    let descriptor = find_builtin("LocalCompilationTestingTimes").unwrap();
    let panels = select_panels(&descriptor, &results).unwrap();
    let hardhat = &panels[0].series[0];
    assert_eq!(hardhat.framework_name, "Hardhat");
    assert_eq!(
        descriptor.annotation.texts(&hardhat.values()),
        vec!["2.31s".to_owned(), "4.76s (106.06% slower)".to_owned()]
    );
}

#[tokio::test]
async fn every_builtin_selects_panels() {
    let results = fixture().await;
    for descriptor in builtin_descriptors() {
        let panels = select_panels(&descriptor, &results);
        assert!(panels.is_some(), "{} was skipped", descriptor.id);
        for tick in descriptor.y_ticks.ticks(running_max(&panels.unwrap())).unwrap() {
            assert_ne!(tick, 0.0);
        }
    }
}

#[tokio::test]
async fn every_builtin_renders_a_png() {
    let results = fixture().await;
    let palette = Palette::from_frameworks(&results.frameworks).unwrap();
    let dir = tempfile::tempdir().unwrap();

    for descriptor in builtin_descriptors() {
        let path = render_descriptor(
            &descriptor,
            &results,
            &palette,
            dir.path(),
            &Settings::default(),
        )
        .unwrap()
        .unwrap_or_else(|| panic!("{} was skipped", descriptor.id));

        assert_eq!(path, dir.path().join(descriptor.filename()));
        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size > 0, "{} is empty", path.display());
    }
}

#[tokio::test]
async fn panels_share_the_descriptor_y_axis() {
    let results = fixture().await;
    let descriptor = find_builtin("TestExecutionTimes").unwrap();
    let panels = select_panels(&descriptor, &results).unwrap();

    let axis = TickAxis::y_axis(&descriptor, &panels).unwrap();
    assert_eq!(
        axis.ticks(),
        descriptor.y_ticks.ticks(running_max(&panels)).unwrap().as_slice()
    );
    assert!(!axis.ticks().contains(&0.0));
    // the first panel's own values would stop the ticks earlier
    let first = TickAxis::y_axis(&descriptor, &panels[..1]).unwrap();
    assert!(first.ticks().len() < axis.ticks().len());
}
