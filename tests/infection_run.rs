use std::{fs, path::Path};

use contagion::{
    generator::{labelled_graph, GraphGenerator},
    infection::{infect_all, limited_infection, InfectionKind},
    layout::ForceLayout,
    renderer::Renderer,
};

fn snapshot_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn expected_names(kind: InfectionKind, steps: usize) -> Vec<String> {
    let mut names: Vec<String> = (0..steps)
        .map(|step| format!("{}{}.png", kind.file_stem(), step))
        .collect();
    names.sort();
    names
}

fn renderer(dir: &Path, graph: &contagion::generator::InfectionGraph) -> Renderer {
    Renderer::builder()
        .output_dir(dir)
        .size(300, 300)
        .node_radius(6.0)
        .label_scale(1)
        .layout(ForceLayout::builder().iterations(50).build())
        .build(graph)
        .unwrap()
}

#[test]
fn one_image_per_step_numbered_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let graph = GraphGenerator::new().seed(2024).generate().unwrap();

    let mut renderer = renderer(dir.path(), &graph);
    let report = infect_all(&graph, &mut renderer).unwrap();

    assert_eq!(
        snapshot_names(dir.path()),
        expected_names(InfectionKind::All, report.steps)
    );
    assert!(report.infected <= report.total);
}

#[test]
fn both_runs_share_a_directory_without_clashing() {
    let dir = tempfile::tempdir().unwrap();
    let generator = GraphGenerator::new().seed(5);

    let first = generator.generate().unwrap();
    let all = infect_all(&first, &mut renderer(dir.path(), &first)).unwrap();

    let second = GraphGenerator::new().seed(6).generate().unwrap();
    let limited = limited_infection(&second, 4, &mut renderer(dir.path(), &second)).unwrap();

    let mut expected = expected_names(InfectionKind::All, all.steps);
    expected.extend(expected_names(InfectionKind::limited(), limited.steps));
    expected.sort();
    assert_eq!(snapshot_names(dir.path()), expected);
}

#[test]
fn hand_built_graph_renders_every_layer() {
    let dir = tempfile::tempdir().unwrap();
    let graph = labelled_graph(4, &[(0, 1), (0, 2), (2, 3)]).unwrap();

    let mut renderer = renderer(dir.path(), &graph);
    let report = infect_all(&graph, &mut renderer).unwrap();

    assert_eq!(report.steps, 2);
    assert!(report.fully_infected());
    assert_eq!(
        snapshot_names(dir.path()),
        vec!["All_Infected0.png", "All_Infected1.png"]
    );
}

#[test]
fn graph_without_roots_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let graph = labelled_graph(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();

    let mut renderer = renderer(dir.path(), &graph);
    let report = infect_all(&graph, &mut renderer).unwrap();

    assert_eq!(report.steps, 0);
    assert!(snapshot_names(dir.path()).is_empty());
}
