use fieldtree::{FieldMap, FieldVertex, Point};
use plotters::prelude::*;

/// Solenoid-like analytic field: an axial component that falls off away
/// from the origin plus a weak transverse swirl.
fn analytic_field(p: &Point) -> [f64; 3] {
    let r2 = p.x * p.x + p.y * p.y;
    let bz = 1.0 / (1.0 + p.z * p.z + 0.5 * r2);
    [-0.1 * p.y * bz, 0.1 * p.x * bz, bz]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Sample the analytic field on a regular grid over [-2, 2]^3.
    let mut samples = Vec::new();
    for xi in -4i32..=4 {
        for yi in -4i32..=4 {
            for zi in -4i32..=4 {
                let point = Point::new(xi as f64 * 0.5, yi as f64 * 0.5, zi as f64 * 0.5);
                samples.push(FieldVertex::new(point, analytic_field(&point)));
            }
        }
    }
    let map = FieldMap::new(samples)?;

    // Probe along a line parallel to the z axis, off-centre.
    let steps = 200;
    let mut analytic = Vec::with_capacity(steps + 1);
    let mut interpolated = Vec::with_capacity(steps + 1);
    let mut max_error = 0.0f64;
    for step in 0..=steps {
        let z = -2.0 + 4.0 * step as f64 / steps as f64;
        let point = Point::new(0.3, 0.1, z);
        let exact = analytic_field(&point)[2];
        let value = map.field_at(&point)?[2];
        max_error = max_error.max((value - exact).abs());
        analytic.push((z, exact));
        interpolated.push((z, value));
    }

    let filename = "field_profile.svg";
    let root = SVGBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Axial Field Profile at x=0.3, y=0.1", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(-2.0..2.0, 0.0..1.1)?;

    chart.configure_mesh().x_desc("z").y_desc("Bz").draw()?;

    chart
        .draw_series(LineSeries::new(analytic, &RED))?
        .label("analytic")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart
        .draw_series(LineSeries::new(interpolated, &BLUE))?
        .label("interpolated")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Example output saved to {}", filename);
    println!("Max interpolation error along the line: {:.5}", max_error);
    Ok(())
}
