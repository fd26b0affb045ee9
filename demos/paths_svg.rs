use plotters::prelude::*;
use rggpath::{ExperimentDriver, Point, TrialResult};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let filename = "paths.svg";
    let start = Point::new(0.1, 0.1);
    let end = Point::new(1.0, 1.0);

    let mut driver: ExperimentDriver = ExperimentDriver::from_entropy();
    let results = driver.par_single_sweep(start, end, 100, 400, 0.1)?;
    let found = results.iter().filter(|r| r.is_found()).count();
    println!("{} of {} trials connected", found, results.len());

    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Shortest paths, n = 400, eps = 0.1", ("sans-serif", 24))
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;

    // Draw bounding box
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)],
        BLACK.stroke_width(2),
    )))?;

    // Draw paths
    for result in &results {
        if let TrialResult::Found { path, .. } = result {
            let line: Vec<(f64, f64)> = path.iter().map(|p| (p.x, p.y)).collect();
            chart.draw_series(std::iter::once(PathElement::new(line, BLUE.mix(0.3))))?;
        }
    }

    // Draw query locations
    chart.draw_series([start, end].iter().map(|p| Circle::new((p.x, p.y), 6, RED.filled())))?;

    root.present()?;
    println!("Output saved to {}", filename);
    Ok(())
}
