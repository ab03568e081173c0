use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde::Deserialize;
use vorotwo::{BoundingBox, Tessellation};

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    bounds: [f64; 4],
    sites: Vec<[f64; 2]>,
    cells: Vec<ExpectedCell>,
}

#[derive(Debug, Deserialize)]
struct ExpectedCell {
    vertices: usize,
    area: f64,
    centroid: Option<[f64; 2]>,
}

fn load_scenarios() -> Vec<Scenario> {
    // Locate the data directory relative to the manifest
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let path = PathBuf::from(manifest_dir).join("tests").join("data").join("scenarios.json");
    let file = File::open(&path).expect("Failed to open scenarios.json");
    serde_json::from_reader(BufReader::new(file)).expect("Failed to parse scenarios.json")
}

#[test]
fn test_comparisons_scenarios() {
    let scenarios = load_scenarios();
    assert!(!scenarios.is_empty());

    for scenario in &scenarios {
        let [min_x, min_y, max_x, max_y] = scenario.bounds;
        let mut tess = Tessellation::new(BoundingBox::new([min_x, min_y], [max_x, max_y]));
        let generators: Vec<f64> = scenario.sites.iter().flatten().copied().collect();
        tess.set_generators(&generators);
        tess.calculate()
            .unwrap_or_else(|e| panic!("Scenario {} failed: {}", scenario.name, e));

        assert_eq!(tess.count_cells(), scenario.cells.len(), "Scenario {}", scenario.name);
        for (i, expected) in scenario.cells.iter().enumerate() {
            let cell = tess.get_cell(i).expect("Should have cell");
            assert_eq!(
                cell.count_vertices(),
                expected.vertices,
                "Scenario {} cell {}: vertex count mismatch",
                scenario.name,
                i
            );
            assert!(
                (cell.area() - expected.area).abs() < 1e-6,
                "Scenario {} cell {}: area {} should be {}",
                scenario.name,
                i,
                cell.area(),
                expected.area
            );
            match (cell.centroid(), expected.centroid) {
                (Some(actual), Some(want)) => assert!(
                    (actual[0] - want[0]).abs() < 1e-6 && (actual[1] - want[1]).abs() < 1e-6,
                    "Scenario {} cell {}: centroid {:?} should be {:?}",
                    scenario.name,
                    i,
                    actual,
                    want
                ),
                (actual, want) => assert_eq!(actual, want, "Scenario {} cell {}", scenario.name, i),
            }
        }
    }
}
