use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use tracing::{debug, info};

use super::figure::FigureView;
use crate::color::ColorScheme;
use crate::config::Config;
use crate::plot::{figure_set, Figure};
use crate::record::BikeGeometry;

/// Viewer state: the figures on screen and which one is shown
pub struct Viewer<'a> {
    geometries: &'a [BikeGeometry],
    record: usize,
    color_scheme: ColorScheme,
    figures: Vec<Figure>,
    current: usize,
}

/// What a key press asks the viewer to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Next,
    Prev,
    NextColor,
    Quit,
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match key {
            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Action::Quit,
            KeyEvent {
                code: KeyCode::Right | KeyCode::Char('n') | KeyCode::Char(' '),
                ..
            } => Action::Next,
            KeyEvent {
                code: KeyCode::Left | KeyCode::Char('p'),
                ..
            } => Action::Prev,
            KeyEvent {
                code: KeyCode::Char('c'),
                ..
            } => Action::NextColor,
            _ => Action::None,
        }
    }
}

impl<'a> Viewer<'a> {
    pub fn new(geometries: &'a [BikeGeometry], record: usize, color_scheme: ColorScheme) -> Result<Self> {
        let figures = figure_set(geometries, record, color_scheme)?;
        Ok(Self {
            geometries,
            record,
            color_scheme,
            figures,
            current: 0,
        })
    }

    pub fn current(&self) -> &Figure {
        &self.figures[self.current]
    }

    /// Apply an action; returns false once the viewer should close.
    pub fn apply(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Quit => return Ok(false),
            Action::Next => self.current = (self.current + 1) % self.figures.len(),
            Action::Prev => {
                self.current = (self.current + self.figures.len() - 1) % self.figures.len()
            }
            Action::NextColor => {
                self.color_scheme = self.color_scheme.next();
                self.figures = figure_set(self.geometries, self.record, self.color_scheme)?;
                debug!("Color scheme: {}", self.color_scheme.name());
            }
            Action::None => {}
        }
        Ok(true)
    }

    fn render(&self, frame: &mut Frame) {
        let [status_area, figure_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(frame.area());

        frame.render_widget(FigureView::new(self.current()), figure_area);
        self.render_status(frame, status_area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let status = format!(
            " [n]ext | [p]rev | [c]olor: {} | [q]uit    figure {}/{} ",
            self.color_scheme.name(),
            self.current + 1,
            self.figures.len()
        );

        for (i, ch) in status.chars().enumerate() {
            if i < area.width as usize {
                let cell = frame.buffer_mut().cell_mut((area.x + i as u16, area.y));
                if let Some(cell) = cell {
                    cell.set_char(ch);
                    cell.set_fg(Color::DarkGray);
                }
            }
        }
    }
}

pub fn run(geometries: &[BikeGeometry], config: &Config) -> Result<()> {
    // Build figures before touching the terminal so bad input fails cleanly
    let mut viewer = Viewer::new(geometries, config.plot.record, config.plot.color_scheme)?;
    info!("Showing {} bikes", geometries.len());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut viewer);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, viewer: &mut Viewer) -> Result<()> {
    loop {
        terminal.draw(|frame| viewer.render(frame))?;

        // Any event (including resize) triggers a redraw
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !viewer.apply(Action::from(key))? {
                break;
            }
        }
    }

    Ok(())
}
