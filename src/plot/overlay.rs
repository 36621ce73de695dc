use super::{Annotation, Figure, MarkerShape, Projection, Series, ORIGIN_COLOR};
use crate::color::ColorScheme;
use crate::record::BikeGeometry;

/// Reference point placed at the origin of an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Center {
    BottomBracket,
    Saddle,
}

impl Center {
    fn origin_label(&self) -> &'static str {
        match self {
            Center::BottomBracket => "Bottom Bracket (0,0)",
            Center::Saddle => "Saddle (0,0)",
        }
    }

    /// Handlebar and the other contact point, in this frame.
    fn points(&self, g: &BikeGeometry) -> [(f64, f64); 2] {
        match self {
            Center::BottomBracket => [(g.handlebar_x, g.handlebar_y), (g.saddle_x, g.saddle_y)],
            Center::Saddle => [
                (g.s_handlebar_x, g.s_handlebar_y),
                (g.s_bottom_bracket_x, g.s_bottom_bracket_y),
            ],
        }
    }
}

/// Every bike on shared axes, grouped by bike name in first-seen order.
///
/// Each group gets one color and one marker shape. Only the handlebar series
/// of a group appears in the legend.
pub fn overlay_figure(geometries: &[BikeGeometry], center: Center, scheme: ColorScheme) -> Figure {
    let mut names: Vec<&str> = Vec::new();
    for g in geometries {
        if !names.contains(&g.bike_name.as_str()) {
            names.push(&g.bike_name);
        }
    }

    let mut series = Vec::with_capacity(names.len() * 2 + 1);
    for (i, name) in names.iter().enumerate() {
        let color = scheme.series_color(i, names.len());
        let marker = MarkerShape::CYCLE[i % MarkerShape::CYCLE.len()];

        let mut handlebar = Series::new(*name, marker, color);
        let mut contact = Series::new(*name, marker, color).hidden();
        for g in geometries.iter().filter(|g| g.bike_name == *name) {
            let [h, c] = center.points(g);
            handlebar.points.push(h);
            contact.points.push(c);
        }
        series.push(handlebar);
        series.push(contact);
    }

    let label = center.origin_label();
    series.push(Series::new(label, MarkerShape::Plus, ORIGIN_COLOR).point(0.0, 0.0));

    let text_y = match center {
        Center::Saddle => -45.0,
        Center::BottomBracket => 15.0,
    };

    Figure {
        title: match center {
            Center::BottomBracket => "Bike Geometry - centered on bottom bracket".to_string(),
            Center::Saddle => "Bike Geometry - centered on saddle".to_string(),
        },
        projection: Projection::Cartesian,
        series,
        annotations: vec![Annotation {
            x: 15.0,
            y: text_y,
            text: label.to_string(),
        }],
        legend_title: "Models".to_string(),
        axis_labels: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::tests::geometry;

    fn bikes() -> Vec<BikeGeometry> {
        vec![
            geometry("Road", 450.0, 25.0, 600.0, 195.0),
            geometry("Gravel", 430.0, 30.0, 610.0, 200.0),
            geometry("Road", 455.0, 24.0, 605.0, 196.0),
        ]
    }

    #[test]
    fn groups_rows_by_bike_name() {
        let bikes = bikes();
        let figure = overlay_figure(&bikes, Center::BottomBracket, ColorScheme::Tab10);

        let legend: Vec<_> = figure.legend_entries().map(|s| s.label.as_str()).collect();
        assert_eq!(legend, ["Road", "Gravel", "Bottom Bracket (0,0)"]);

        let road = &figure.series[0];
        assert_eq!(road.points.len(), 2);
        assert_eq!(road.points[1], (bikes[2].handlebar_x, bikes[2].handlebar_y));
        assert_eq!(figure.series[1].points[0], (bikes[0].saddle_x, bikes[0].saddle_y));
    }

    #[test]
    fn groups_share_color_and_differ_between_bikes() {
        let figure = overlay_figure(&bikes(), Center::Saddle, ColorScheme::Tab10);
        let (road, road_contact, gravel) = (&figure.series[0], &figure.series[1], &figure.series[2]);
        assert_eq!(road.color, road_contact.color);
        assert_eq!(road.marker, road_contact.marker);
        assert_ne!(road.color, gravel.color);
        assert_ne!(road.marker, gravel.marker);
    }

    #[test]
    fn saddle_center_uses_saddle_frame_fields() {
        let bikes = bikes();
        let figure = overlay_figure(&bikes, Center::Saddle, ColorScheme::Tab10);
        assert_eq!(figure.series[0].points[0], (bikes[0].s_handlebar_x, bikes[0].s_handlebar_y));
        assert_eq!(
            figure.series[1].points[0],
            (bikes[0].s_bottom_bracket_x, bikes[0].s_bottom_bracket_y)
        );
        assert_eq!(figure.annotations[0].text, "Saddle (0,0)");
        assert_eq!((figure.annotations[0].x, figure.annotations[0].y), (15.0, -45.0));
    }

    #[test]
    fn origin_marker_sits_at_zero() {
        let figure = overlay_figure(&bikes(), Center::BottomBracket, ColorScheme::Tab10);
        let origin = figure.series.last().unwrap();
        assert_eq!(origin.marker, MarkerShape::Plus);
        assert_eq!(origin.points, vec![(0.0, 0.0)]);
        assert_eq!(figure.annotations[0].y, 15.0);
    }
}
