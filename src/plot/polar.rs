use super::{Figure, MarkerShape, Projection, Series, BLUE, GREEN, RED};
use crate::record::BikeGeometry;

/// One bike in the saddle frame, drawn on polar axes.
///
/// Measured angles run clockwise while polar axes run counter-clockwise, so
/// theta is negated before plotting.
pub fn polar_figure(geometry: &BikeGeometry) -> Figure {
    Figure {
        title: "Bike Fit - Polar Coordinate System".to_string(),
        projection: Projection::Polar,
        series: vec![
            Series::new("Handlebar", MarkerShape::Circle, BLUE)
                .point(-geometry.theta_to_handlebar, geometry.r_to_handlebar),
            Series::new("Bottom Bracket", MarkerShape::Circle, RED)
                .point(-geometry.theta_to_bottom_bracket, geometry.r_to_bottom_bracket),
            Series::new("Saddle", MarkerShape::Cross, GREEN).point(0.0, 0.0),
        ],
        annotations: Vec::new(),
        legend_title: "Bike Parts".to_string(),
        axis_labels: Some(("θ (deg)".to_string(), "r (mm)".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::tests::geometry;

    #[test]
    fn negates_theta_before_plotting() {
        let g = geometry("Road", 450.0, 25.0, 600.0, 195.0);
        let figure = polar_figure(&g);

        let (theta, r) = figure.series[0].points[0];
        assert!((theta + g.theta_to_handlebar).abs() < 1e-12);
        assert_eq!(r, g.r_to_handlebar);
        let (theta, r) = figure.series[1].points[0];
        assert!((theta + g.theta_to_bottom_bracket).abs() < 1e-12);
        assert_eq!(r, g.r_to_bottom_bracket);
    }

    #[test]
    fn drawn_handlebar_matches_saddle_frame_position() {
        let g = geometry("Road", 450.0, 25.0, 600.0, 195.0);
        let figure = polar_figure(&g);
        let (x, y) = figure.plane_points(&figure.series[0]).next().unwrap();
        assert!((x - g.s_handlebar_x).abs() < 1e-6, "{x} vs {}", g.s_handlebar_x);
        assert!((y - g.s_handlebar_y).abs() < 1e-6, "{y} vs {}", g.s_handlebar_y);
    }
}
