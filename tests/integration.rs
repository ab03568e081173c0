use vorotwo::{
    BOX_ID_BOTTOM, BOX_ID_LEFT, BOX_ID_RIGHT, BOX_ID_TOP, BoundingBox, Cell2D, Tessellation, TessellationOptions,
    VoronoiError,
};

fn square(size: f64) -> BoundingBox {
    BoundingBox::new([0.0, 0.0], [size, size])
}

fn tessellate(bounds: BoundingBox, generators: &[f64]) -> Tessellation {
    let mut tess = Tessellation::new(bounds);
    tess.set_generators(generators);
    tess.calculate().expect("tessellation should succeed");
    tess
}

fn assert_close(actual: [f64; 2], expected: [f64; 2], tol: f64) {
    assert!(
        (actual[0] - expected[0]).abs() < tol && (actual[1] - expected[1]).abs() < tol,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn sorted_points(cell: &Cell2D) -> Vec<[f64; 2]> {
    let mut points: Vec<[f64; 2]> = cell.points().collect();
    points.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    points
}

#[test]
fn test_single_site_fills_the_box() {
    for site in [[500.0, 500.0], [1.0, 999.0], [0.0, 0.0], [1000.0, 250.0]] {
        let tess = tessellate(square(1000.0), &site);
        assert_eq!(tess.count_cells(), 1);

        let cell = tess.get_cell(0).expect("Should have cell 0");
        assert_eq!(cell.id(), 0);
        assert_eq!(cell.site(), site);
        assert_eq!(cell.count_vertices(), 4);
        assert!((cell.area() - 1_000_000.0).abs() < 1e-6);
        assert_close(cell.centroid().unwrap(), [500.0, 500.0], 1e-9);
        assert_eq!(cell.edge_neighbors(), &[BOX_ID_BOTTOM, BOX_ID_RIGHT, BOX_ID_TOP, BOX_ID_LEFT]);

        assert_eq!(tess.count_edges(), 4);
        assert!(tess.edges().iter().all(|e| e.is_border() && e.left() == 0));
    }
}

#[test]
fn test_two_sites_split_horizontally() {
    let tess = tessellate(square(1000.0), &[500.0, 300.0, 500.0, 700.0]);

    let natural: Vec<_> = tess.edges().iter().filter(|e| !e.is_border()).collect();
    assert_eq!(natural.len(), 1);
    let edge = natural[0];
    assert_eq!(edge.va()[1], 500.0);
    assert_eq!(edge.vb()[1], 500.0);
    assert!((edge.length() - 1000.0).abs() < 1e-9);
    // The upper site is on the left of the edge.
    assert_eq!((edge.left(), edge.right()), (1, Some(0)));

    let lower = tess.get_cell(0).unwrap();
    let upper = tess.get_cell(1).unwrap();
    assert_close(lower.centroid().unwrap(), [500.0, 250.0], 1e-9);
    assert_close(upper.centroid().unwrap(), [500.0, 750.0], 1e-9);
    assert_eq!(sorted_points(lower), vec![[0.0, 0.0], [0.0, 500.0], [1000.0, 0.0], [1000.0, 500.0]]);
    assert_eq!(sorted_points(upper), vec![[0.0, 500.0], [0.0, 1000.0], [1000.0, 500.0], [1000.0, 1000.0]]);
}

#[test]
fn test_diagonal_sites_make_triangular_cells() {
    let tess = tessellate(square(1000.0), &[100.0, 900.0, 500.0, 500.0, 900.0, 100.0]);

    let top_left = tess.get_cell(0).unwrap();
    assert_eq!(top_left.count_vertices(), 3);
    assert_close(top_left.centroid().unwrap(), [200.0, 800.0], 1e-6);
    for (actual, expected) in sorted_points(top_left).into_iter().zip([[0.0, 400.0], [0.0, 1000.0], [600.0, 1000.0]]) {
        assert_close(actual, expected, 1e-6);
    }

    let bottom_right = tess.get_cell(2).unwrap();
    assert_eq!(bottom_right.count_vertices(), 3);
    assert_close(bottom_right.centroid().unwrap(), [800.0, 200.0], 1e-6);

    // The mean of the three vertices is the centroid of a triangle.
    let mean = bottom_right.points().fold([0.0, 0.0], |acc, p| [acc[0] + p[0] / 3.0, acc[1] + p[1] / 3.0]);
    assert_close(bottom_right.centroid().unwrap(), mean, 1e-6);

    let middle = tess.get_cell(1).unwrap();
    assert_eq!(middle.count_vertices(), 6);
    assert!((middle.area() - 640_000.0).abs() < 1e-6);
    assert_close(middle.centroid().unwrap(), [500.0, 500.0], 1e-6);
}

#[test]
fn test_no_sites() {
    let mut tess = Tessellation::new(square(1000.0));
    tess.set_generators(&[]);
    assert!(tess.calculate().is_ok());
    assert_eq!(tess.count_cells(), 0);
    assert_eq!(tess.count_edges(), 0);
}

#[test]
fn test_invalid_bounds() {
    for bounds in [
        BoundingBox::new([0.0, 0.0], [0.0, 10.0]),
        BoundingBox::new([0.0, 10.0], [10.0, 0.0]),
        BoundingBox::new([0.0, 0.0], [f64::NAN, 10.0]),
    ] {
        let mut tess = Tessellation::new(bounds);
        tess.set_generators(&[1.0, 1.0]);
        assert!(matches!(tess.calculate(), Err(VoronoiError::InvalidBounds { .. })));
        assert_eq!(tess.count_cells(), 0);
    }
}

#[test]
fn test_duplicate_sites() {
    let mut tess = Tessellation::new(square(1000.0));
    tess.set_generators(&[10.0, 10.0, 20.0, 20.0, 30.0, 30.0, 20.0, 20.0]);
    let err = tess.calculate().unwrap_err();
    assert_eq!(err, VoronoiError::DuplicateSite { first: 1, second: 3 });
    assert_eq!(err.to_string(), "duplicate sites 1 and 3");
}

#[test]
fn test_grid_of_sites() {
    let mut generators = Vec::new();
    for y in [150.0, 450.0, 750.0] {
        for x in [150.0, 450.0, 750.0] {
            generators.push(x);
            generators.push(y);
        }
    }
    let tess = tessellate(square(900.0), &generators);

    assert_eq!(tess.count_cells(), 9);
    for (i, cell) in tess.cells().iter().enumerate() {
        assert_eq!(cell.count_vertices(), 4, "Cell {} should be a square", i);
        assert!((cell.area() - 90_000.0).abs() < 1e-6, "Cell {} area {}", i, cell.area());
        assert_close(cell.centroid().unwrap(), cell.site(), 1e-6);
    }
    // The center cell touches no wall.
    assert!(tess.get_cell(4).unwrap().edge_neighbors().iter().all(|&n| n >= 0));
}

#[test]
fn test_collinear_sites() {
    // A row sharing the first sweep position: vertical strips.
    let row: Vec<f64> = (0..10).flat_map(|i| [50.0 + 100.0 * i as f64, 500.0]).collect();
    let tess = tessellate(square(1000.0), &row);
    for cell in tess.cells() {
        assert_eq!(cell.count_vertices(), 4);
        assert!((cell.area() - 100_000.0).abs() < 1e-6);
        assert_close(cell.centroid().unwrap(), cell.site(), 1e-6);
    }

    // A column: horizontal strips.
    let column: Vec<f64> = (0..10).flat_map(|i| [500.0, 950.0 - 100.0 * i as f64]).collect();
    let tess = tessellate(square(1000.0), &column);
    for cell in tess.cells() {
        assert_eq!(cell.count_vertices(), 4);
        assert!((cell.area() - 100_000.0).abs() < 1e-6);
    }
}

#[test]
fn test_sites_on_the_boundary() {
    let tess = tessellate(square(1000.0), &[0.0, 500.0, 1000.0, 500.0, 500.0, 0.0]);
    let total: f64 = tess.cells().iter().map(|c| c.area()).sum();
    assert!((total - 1_000_000.0).abs() < 1e-6);
    // All three cells meet at the center, equidistant from the sites.
    for cell in tess.cells() {
        assert!(cell.points().any(|p| (p[0] - 500.0).abs() < 1e-6 && (p[1] - 500.0).abs() < 1e-6));
    }
    assert_eq!(tess.get_cell(2).unwrap().count_vertices(), 3);
    for cell in tess.cells() {
        assert!(cell.contains(cell.site()));
    }
}

#[test]
fn test_sites_outside_the_box() {
    // The second site is below the box: its cell is the strip under y = 150.
    let tess = tessellate(square(1000.0), &[500.0, 500.0, 500.0, -200.0, 5000.0, 5000.0]);
    let outside = tess.get_cell(1).unwrap();
    assert!((outside.area() - 150_000.0).abs() < 1e-6);
    assert_close(outside.centroid().unwrap(), [500.0, 75.0], 1e-6);

    // The far away site does not reach the box.
    let far = tess.get_cell(2).unwrap();
    assert!(far.is_empty());
    assert_eq!(far.centroid(), None);

    let total: f64 = tess.cells().iter().map(|c| c.area()).sum();
    assert!((total - 1_000_000.0).abs() < 1e-6);
}

#[test]
fn test_open_cells() {
    let options = TessellationOptions::default().with_close_cells(false);
    let mut tess = Tessellation::with_options(square(1000.0), options);
    tess.set_generators(&[100.0, 900.0, 500.0, 500.0, 900.0, 100.0]);
    tess.calculate().unwrap();

    assert_eq!(tess.count_edges(), 2);
    assert_eq!(tess.count_cells(), 3);
    assert_eq!(tess.get_cell(1).unwrap().edges().len(), 2);
    for cell in tess.cells() {
        assert!(cell.is_empty());
        assert_eq!(cell.centroid(), None);
        assert!(cell.edge_neighbors().is_empty());
    }
}

#[test]
fn test_cell_edges_match_neighbors() {
    let mut tess = Tessellation::new(square(1000.0));
    tess.random_generators(64);
    tess.calculate().unwrap();

    for cell in tess.cells() {
        assert_eq!(cell.edges().len(), cell.edge_neighbors().len());
        for (&index, &neighbor) in cell.edges().iter().zip(cell.edge_neighbors()) {
            let edge = &tess.edges()[index];
            if neighbor < 0 {
                assert_eq!(edge.side(), Some(neighbor));
                assert_eq!(edge.left(), cell.id());
            } else {
                let pair = (edge.left(), edge.right().unwrap());
                let n = neighbor as usize;
                assert!(pair == (cell.id(), n) || pair == (n, cell.id()));
            }
        }
    }
}
