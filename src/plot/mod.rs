//! Figure models
//!
//! Figures are plain data built from completed geometries. Nothing here knows
//! how a figure gets drawn; see `display` for the terminal renderer.

mod cartesian;
mod overlay;
mod polar;

pub use cartesian::cartesian_figure;
pub use overlay::{overlay_figure, Center};
pub use polar::polar_figure;

use crate::color::ColorScheme;
use crate::error::DataError;
use crate::record::BikeGeometry;

pub type Rgb = (u8, u8, u8);

pub const BLUE: Rgb = (40, 110, 230);
pub const RED: Rgb = (220, 50, 47);
pub const GREEN: Rgb = (60, 180, 75);
pub const ORIGIN_COLOR: Rgb = (220, 220, 220);

/// How series points are interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Points are `(x, y)` in millimeters.
    Cartesian,
    /// Points are `(theta, r)`, theta in degrees counter-clockwise from +x.
    Polar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Star,
    Ring,
    Cross,
    Plus,
}

impl MarkerShape {
    /// Shapes handed out to successive bikes in an overlay.
    pub const CYCLE: [MarkerShape; 6] = [
        MarkerShape::Circle,
        MarkerShape::Square,
        MarkerShape::Triangle,
        MarkerShape::Diamond,
        MarkerShape::Star,
        MarkerShape::Ring,
    ];

    pub fn glyph(&self) -> &'static str {
        match self {
            MarkerShape::Circle => "●",
            MarkerShape::Square => "■",
            MarkerShape::Triangle => "▲",
            MarkerShape::Diamond => "◆",
            MarkerShape::Star => "★",
            MarkerShape::Ring => "○",
            MarkerShape::Cross => "✕",
            MarkerShape::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub marker: MarkerShape,
    pub color: Rgb,
    pub in_legend: bool,
}

impl Series {
    pub fn new(label: impl Into<String>, marker: MarkerShape, color: Rgb) -> Self {
        Self {
            label: label.into(),
            points: Vec::new(),
            marker,
            color,
            in_legend: true,
        }
    }

    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.points.push((x, y));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.in_legend = false;
        self
    }
}

/// Text placed at a position in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub projection: Projection,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    pub legend_title: String,
    /// Axis labels; `None` hides axes and labels.
    pub axis_labels: Option<(String, String)>,
}

impl Figure {
    /// Series points mapped onto the drawing plane (`x` right, `y` up).
    pub fn plane_points<'a>(&self, series: &'a Series) -> impl Iterator<Item = (f64, f64)> + 'a {
        let projection = self.projection;
        series.points.iter().map(move |&(a, b)| match projection {
            Projection::Cartesian => (a, b),
            Projection::Polar => {
                let (sin, cos) = a.to_radians().sin_cos();
                (b * cos, b * sin)
            }
        })
    }

    /// `(min_x, max_x, min_y, max_y)` of everything drawn, origin included.
    ///
    /// Polar figures are square around the pole so rings stay centered.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let points = self.series.iter().flat_map(|s| self.plane_points(s));

        match self.projection {
            Projection::Polar => {
                let r = points.fold(0.0_f64, |acc, (x, y)| acc.max(x.hypot(y)));
                (-r, r, -r, r)
            }
            Projection::Cartesian => {
                let annotations = self.annotations.iter().map(|a| (a.x, a.y));
                points.chain(annotations).fold(
                    (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64),
                    |(x0, x1, y0, y1), (x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
                )
            }
        }
    }

    pub fn legend_entries(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| s.in_legend)
    }
}

/// The four figures shown by the tool, in display order: the selected bike in
/// Cartesian and polar form, then every bike centered on the bottom bracket
/// and on the saddle.
pub fn figure_set(
    geometries: &[BikeGeometry],
    record: usize,
    scheme: ColorScheme,
) -> Result<Vec<Figure>, DataError> {
    let selected = geometries.get(record).ok_or(DataError::RecordIndex {
        index: record,
        len: geometries.len(),
    })?;

    Ok(vec![
        cartesian_figure(selected),
        polar_figure(selected),
        overlay_figure(geometries, Center::BottomBracket, scheme),
        overlay_figure(geometries, Center::Saddle, scheme),
    ])
}
