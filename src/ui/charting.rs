/// Compute the X (sample index) and Y (keys/sec) upper bounds for the rate chart
pub fn compute_chart_params(points: &[(f64, f64)]) -> (f64, f64) {
    let x_max = points.last().map(|p| p.0).unwrap_or(0.0).max(1.0);

    let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max).ceil().max(1.0);

    (x_max, y_max)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
