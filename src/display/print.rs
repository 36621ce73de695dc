use anyhow::Result;
use ratatui::prelude::*;
use std::io::{self, Write};
use tracing::info;

use super::figure::FigureView;
use crate::config::Config;
use crate::plot::{figure_set, Figure};
use crate::record::BikeGeometry;

/// Render every figure off-screen and write it to stdout as plain text.
pub fn run(geometries: &[BikeGeometry], config: &Config) -> Result<()> {
    let figures = figure_set(geometries, config.plot.record, config.plot.color_scheme)?;
    let (width, height) = (config.display.print_width, config.display.print_height);
    info!("Printing {} figures at {}x{}", figures.len(), width, height);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for figure in &figures {
        for line in render_lines(figure, width, height) {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Text rows of a figure drawn into a `width` x `height` cell buffer.
pub fn render_lines(figure: &Figure, width: u16, height: u16) -> Vec<String> {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    FigureView::new(figure).render(area, &mut buf);

    (0..height)
        .map(|y| {
            let row: String = (0..width)
                .map(|x| buf.cell((x, y)).map_or(" ", |cell| cell.symbol()))
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}
