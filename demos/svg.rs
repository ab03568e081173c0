use plotters::prelude::*;
use rand::Rng;
use vorotwo::{BoundingBox, Tessellation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_example("2d_tessellation_random.svg", 0)?;
    run_example("2d_tessellation_relaxed.svg", 20)?;
    Ok(())
}

fn run_example(filename: &str, relax_steps: usize) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
    let mut tess = Tessellation::new(bounds);

    let mut rng = rand::thread_rng();
    let mut generators = Vec::with_capacity(1000 * 2);
    for _ in 0..1000 {
        generators.push(rng.gen_range(0.0..100.0));
        generators.push(rng.gen_range(0.0..100.0));
    }
    tess.set_generators(&generators);
    tess.calculate()?;

    for _ in 0..relax_steps {
        tess.relax();
        tess.calculate()?;
    }

    // Draw bounding box
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)],
        BLACK.stroke_width(2),
    )))?;

    // Draw cells
    for cell in tess.cells() {
        if cell.is_empty() {
            continue;
        }
        let mut poly: Vec<(f64, f64)> = cell.points().map(|p| (p[0], p[1])).collect();

        chart.draw_series(std::iter::once(Polygon::new(
            poly.clone(),
            BLUE.mix(0.1).filled(),
        )))?;

        poly.push(poly[0]);
        chart.draw_series(std::iter::once(PathElement::new(
            poly,
            BLACK.mix(0.5),
        )))?;
    }

    // Draw generators
    let points: Vec<(f64, f64)> = tess.generators().chunks(2).map(|c| (c[0], c[1])).collect();
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 2, RED.filled())))?;

    root.present()?;
    println!("Output saved to {} ({} cells, {} edges)", filename, tess.count_cells(), tess.count_edges());
    Ok(())
}
