use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use sysinfo::{System, SystemExt};
use toroid_life::{Cell, Grid, SimulationState, Stats};

/// What one redraw needs to know.
pub struct View<'a> {
    pub grid: &'a Grid,
    pub stats: Stats,
    pub state: SimulationState,
    pub playing: bool,
    pub frames_remaining: Option<u64>,
    pub sys: &'a System,
}

/// Splits the screen 75/25 between the grid and the statistics panel.
pub fn draw(f: &mut Frame, view: &View<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)].as_ref())
        .split(f.size());

    draw_grid(f, view.grid, chunks[0]);
    draw_stats(f, view, chunks[1]);
}

/// Draws the grid, live cells bright on a dark background.
fn draw_grid(f: &mut Frame, grid: &Grid, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Game of Life [Space: Play/Pause | Enter: Step | q: Quit]");

    let alive = Style::default().fg(Color::White).bg(Color::Black);
    let dead = Style::default().fg(Color::DarkGray).bg(Color::Black);

    let lines: Vec<Line> = grid
        .rows()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&v| {
                    if Cell::from_value(v).is_alive() {
                        Span::styled("█", alive)
                    } else {
                        Span::styled(" ", dead)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_stats(f: &mut Frame, view: &View<'_>, area: Rect) {
    let memory_used = view.sys.used_memory() / 1024;
    let memory_total = view.sys.total_memory() / 1024;
    let stats = &view.stats;

    let status = match (view.state, view.playing) {
        (SimulationState::Stopped, _) => "Stopped",
        (_, true) => "Running",
        (_, false) => "Paused",
    };
    let frames = view
        .frames_remaining
        .map_or_else(|| "unbounded".to_string(), |n| n.to_string());

    let stats_text = format!(
        "Statistics:\n\
        Generation: {}\n\
        Current Population: {}\n\
        Cells Created: {}\n\
        Cells Destroyed: {}\n\
        Birth Rate: {:.2}/gen\n\
        Death Rate: {:.2}/gen\n\
        Frames Left: {}\n\
        Memory Usage: {}KB/{:.2}MB\n\
        Status: {}\n",
        stats.generation,
        stats.current_population,
        stats.cells_created,
        stats.cells_destroyed,
        stats.birth_rate(),
        stats.death_rate(),
        frames,
        memory_used,
        memory_total as f64 / 1024.0,
        status,
    );

    let stats_widget = Paragraph::new(stats_text)
        .block(Block::default().borders(Borders::ALL).title("Statistics"))
        .wrap(Wrap { trim: true });

    f.render_widget(stats_widget, area);
}
