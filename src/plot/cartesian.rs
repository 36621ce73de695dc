use super::{Figure, MarkerShape, Projection, Series, BLUE, GREEN, RED};
use crate::record::BikeGeometry;

/// One bike in the bottom-bracket frame: handlebar, saddle, and the bottom
/// bracket at the origin.
pub fn cartesian_figure(geometry: &BikeGeometry) -> Figure {
    Figure {
        title: "Bike Fit - Cartesian Coordinate System".to_string(),
        projection: Projection::Cartesian,
        series: vec![
            Series::new("Handlebar", MarkerShape::Circle, BLUE)
                .point(geometry.handlebar_x, geometry.handlebar_y),
            Series::new("Saddle", MarkerShape::Circle, RED)
                .point(geometry.saddle_x, geometry.saddle_y),
            Series::new("Bottom Bracket", MarkerShape::Cross, GREEN).point(0.0, 0.0),
        ],
        annotations: Vec::new(),
        legend_title: "Bike Parts".to_string(),
        axis_labels: Some(("X (mm)".to_string(), "Y (mm)".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::tests::geometry;

    #[test]
    fn places_parts_in_bottom_bracket_frame() {
        let g = geometry("Road", 450.0, 25.0, 600.0, 195.0);
        let figure = cartesian_figure(&g);

        let labels: Vec<_> = figure.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Handlebar", "Saddle", "Bottom Bracket"]);
        assert_eq!(figure.series[0].points, vec![(g.handlebar_x, g.handlebar_y)]);
        assert_eq!(figure.series[1].points, vec![(g.saddle_x, g.saddle_y)]);
        assert_eq!(figure.series[2].points, vec![(0.0, 0.0)]);
        assert_eq!(figure.series[2].marker, MarkerShape::Cross);
        assert_eq!(figure.legend_entries().count(), 3);
    }
}
