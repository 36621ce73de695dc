use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as Segment};
use ratatui::widgets::{Block, Paragraph};

use crate::plot::{Figure, Projection};

/// Width/height of a single terminal cell; chars are ~2x tall.
const CELL_ASPECT: f64 = 2.0;
/// Margin around the data, as a fraction of its span on each side.
const PADDING: f64 = 0.1;
/// Smallest span drawn, in mm, so a lone point still gets a sensible scale.
const MIN_SPAN: f64 = 100.0;
const LEGEND_MAX_WIDTH: u16 = 32;
const GUIDE_COLOR: Color = Color::DarkGray;
const MAX_RINGS: usize = 16;

/// Draws a [`Figure`]: the plot on a braille canvas with a legend beside it.
pub struct FigureView<'a> {
    figure: &'a Figure,
}

impl<'a> FigureView<'a> {
    pub fn new(figure: &'a Figure) -> Self {
        Self { figure }
    }
}

impl Widget for FigureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let figure = self.figure;
        let legend_width = legend_width(figure).min(area.width / 3);
        let [plot_area, legend_area] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(legend_width)]).areas(area);

        let mut block = Block::bordered().title(Span::styled(
            format!(" {} ", figure.title),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let inner = block.inner(plot_area);
        let (x_bounds, y_bounds) = equal_aspect_bounds(figure.bounds(), inner.width, inner.height);
        if let Some(caption) = axis_caption(figure, x_bounds, y_bounds) {
            block = block.title_bottom(caption);
        }

        Canvas::default()
            .block(block)
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                draw_guides(ctx, figure, x_bounds, y_bounds);
                ctx.layer();
                draw_series(ctx, figure);
            })
            .render(plot_area, buf);

        Paragraph::new(legend_lines(figure))
            .block(Block::bordered().title(format!(" {} ", figure.legend_title)))
            .render(legend_area, buf);
    }
}

/// Canvas bounds around `bounds` with one mm per unit in both directions.
///
/// The visual height of `rows` cells is `rows * CELL_ASPECT` column widths.
pub fn equal_aspect_bounds(bounds: (f64, f64, f64, f64), cols: u16, rows: u16) -> ([f64; 2], [f64; 2]) {
    let (x0, x1, y0, y1) = bounds;
    let span_x = (x1 - x0).max(MIN_SPAN) * (1.0 + 2.0 * PADDING);
    let span_y = (y1 - y0).max(MIN_SPAN) * (1.0 + 2.0 * PADDING);

    let cols = f64::from(cols.max(1));
    let rows = f64::from(rows.max(1)) * CELL_ASPECT;
    let scale = (span_x / cols).max(span_y / rows);

    let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let (half_w, half_h) = (scale * cols / 2.0, scale * rows / 2.0);
    ([cx - half_w, cx + half_w], [cy - half_h, cy + half_h])
}

/// Round a raw step up to 1, 2 or 5 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let norm = raw / magnitude;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn ring_step(figure: &Figure) -> f64 {
    let (_, r_max, _, _) = figure.bounds();
    nice_step(r_max / 4.0)
}

/// Rings up to the one nearest `r_max`, capped at [`MAX_RINGS`].
fn ring_count(r_max: f64, step: f64) -> usize {
    // NaN and negative ratios saturate to 0 in the cast
    ((r_max / step + 0.5).floor() as usize).min(MAX_RINGS)
}

fn draw_guides(ctx: &mut Context, figure: &Figure, x_bounds: [f64; 2], y_bounds: [f64; 2]) {
    match figure.projection {
        Projection::Cartesian => {
            if figure.axis_labels.is_none() {
                return;
            }
            ctx.draw(&Segment {
                x1: x_bounds[0],
                y1: 0.0,
                x2: x_bounds[1],
                y2: 0.0,
                color: GUIDE_COLOR,
            });
            ctx.draw(&Segment {
                x1: 0.0,
                y1: y_bounds[0],
                x2: 0.0,
                y2: y_bounds[1],
                color: GUIDE_COLOR,
            });
        }
        Projection::Polar => {
            let (_, r_max, _, _) = figure.bounds();
            let step = ring_step(figure);
            let rings = ring_count(r_max, step);
            for k in 1..=rings {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: k as f64 * step,
                    color: GUIDE_COLOR,
                });
            }

            let reach = rings as f64 * step;
            for spoke in 0..8 {
                let (sin, cos) = (f64::from(spoke) * 45.0).to_radians().sin_cos();
                ctx.draw(&Segment {
                    x1: 0.0,
                    y1: 0.0,
                    x2: reach * cos,
                    y2: reach * sin,
                    color: GUIDE_COLOR,
                });
            }
        }
    }
}

fn draw_series(ctx: &mut Context, figure: &Figure) {
    for annotation in &figure.annotations {
        ctx.print(
            annotation.x,
            annotation.y,
            Span::styled(annotation.text.clone(), Style::default().fg(Color::Gray)),
        );
    }

    for series in &figure.series {
        let (r, g, b) = series.color;
        let style = Style::default().fg(Color::Rgb(r, g, b)).add_modifier(Modifier::BOLD);
        for (x, y) in figure.plane_points(series) {
            ctx.print(x, y, Span::styled(series.marker.glyph(), style));
        }
    }
}

fn axis_caption(figure: &Figure, x_bounds: [f64; 2], y_bounds: [f64; 2]) -> Option<String> {
    let (x_label, y_label) = figure.axis_labels.as_ref()?;
    Some(match figure.projection {
        Projection::Cartesian => format!(
            " {}: {:.0}..{:.0} | {}: {:.0}..{:.0} ",
            x_label, x_bounds[0], x_bounds[1], y_label, y_bounds[0], y_bounds[1]
        ),
        Projection::Polar => format!(
            " {}: 0° east, counter-clockwise | {}: rings every {} ",
            x_label,
            y_label,
            ring_step(figure)
        ),
    })
}

fn legend_lines(figure: &Figure) -> Vec<Line<'static>> {
    figure
        .legend_entries()
        .map(|series| {
            let (r, g, b) = series.color;
            Line::from(vec![
                Span::styled(series.marker.glyph(), Style::default().fg(Color::Rgb(r, g, b))),
                Span::raw(" "),
                Span::raw(series.label.clone()),
            ])
        })
        .collect()
}

fn legend_width(figure: &Figure) -> u16 {
    let widest = figure
        .legend_entries()
        .map(|s| s.label.chars().count() + 2)
        .chain(std::iter::once(figure.legend_title.chars().count() + 2))
        .max()
        .unwrap_or(0);
    (widest + 2).min(usize::from(LEGEND_MAX_WIDTH)) as u16
}
