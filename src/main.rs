//! # Game of Life
//!
//! Runs Conway's Game of Life on a toroidal grid, either as a terminal view
//! driven by `ratatui` and `crossterm` or headless on a background thread.
//!
//! ## Controls (interactive)
//!
//! * Space: Play/Pause the simulation
//! * Enter: Step forward one generation (when paused)
//! * q: Quit the application

mod ui;

use std::{
    error::Error,
    io,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use sysinfo::{System, SystemExt};
use toroid_life::{
    config::{ModeKind, Overrides},
    pattern::PatternKind,
    Config, Grid, LifeError, Runner, SimulationState,
};

/// Runs Conway's Game of Life simulation.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file with default settings; flags below override it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Side length of the square grid, greater than 8.
    #[arg(long = "grid-size", value_name = "N")]
    grid_size: Option<usize>,
    /// Milliseconds between frames in interactive mode.
    #[arg(long, value_name = "MS")]
    interval: Option<u64>,
    /// Start from a single glider.
    #[arg(long, conflicts_with_all = ["gosper", "empty"])]
    glider: bool,
    /// Start from a Gosper glider gun.
    #[arg(long, conflicts_with = "empty")]
    gosper: bool,
    /// Start from an empty grid.
    #[arg(long)]
    empty: bool,
    /// Live-cell probability for the random start.
    #[arg(long = "p-alive", value_name = "P")]
    p_alive: Option<f64>,
    /// Seed for a reproducible random start.
    #[arg(long)]
    seed: Option<u64>,
    /// Compute generations in the background without drawing.
    #[arg(long)]
    headless: bool,
    /// Number of frames to show before stopping.
    #[arg(long)]
    frames: Option<u64>,
    /// Generation at which a headless run stops.
    #[arg(long)]
    generations: Option<u64>,
}

impl Cli {
    /// Flags that replace values from the defaults and the config file.
    fn overrides(&self) -> Overrides {
        let pattern = if self.glider {
            Some(PatternKind::Glider)
        } else if self.gosper {
            Some(PatternKind::Gosper)
        } else if self.empty {
            Some(PatternKind::Empty)
        } else {
            None
        };
        Overrides {
            grid_size: self.grid_size,
            interval_ms: self.interval,
            pattern,
            p_alive: self.p_alive,
            seed: self.seed,
            headless: self.headless,
            frames: self.frames,
            generations: self.generations,
        }
    }
}

/// Main entry point for the Game of Life application.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or terminal
/// manipulation fails.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref(), &cli.overrides())?;
    info!("starting with {config:?}");

    let runner = Runner::new(config.seed_grid()?, config.run_mode());
    match config.mode {
        ModeKind::Interactive => run_interactive(runner, &config),
        ModeKind::Headless => run_headless(runner, &config),
    }
}

/// Terminal view; advances one frame per interval while playing.
fn run_interactive(mut runner: Runner, config: &Config) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut runner, config.interval());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    runner.stop();
    let stats = runner.stats();
    info!(
        "stopped at generation {} with population {}",
        stats.generation, stats.current_population
    );
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runner: &mut Runner,
    tick_rate: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut sys = System::new_all();
    let mut frame = runner.snapshot();
    let mut playing = false;
    let mut last_tick = Instant::now();
    runner.start()?;

    loop {
        let view = ui::View {
            grid: &frame,
            stats: runner.stats(),
            state: runner.state(),
            playing,
            frames_remaining: runner.frames_remaining(),
            sys: &sys,
        };
        terminal.draw(|f| ui::draw(f, &view))?;

        if runner.state() == SimulationState::Stopped {
            info!("frame budget used up");
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char(' ') => playing = !playing,
                    KeyCode::Enter if !playing => frame = next_frame(runner, frame)?,
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if playing {
                frame = next_frame(runner, frame)?;
            }
            sys.refresh_memory();
            last_tick = Instant::now();
        }
    }
}

fn next_frame(runner: &mut Runner, current: Grid) -> Result<Grid, LifeError> {
    match runner.advance_one_frame() {
        Ok(frame) => Ok(frame),
        Err(LifeError::Stopped) => Ok(current),
        Err(e) => Err(e),
    }
}

/// Background run with periodic telemetry until the target generation.
fn run_headless(mut runner: Runner, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut sys = System::new_all();
    let poll = config.report_every().min(Duration::from_millis(10));
    let mut last_report = Instant::now();
    let started = Instant::now();

    runner.start()?;
    info!("running headless to generation {}", config.generations);

    while runner.generation() < config.generations {
        thread::sleep(poll);
        if last_report.elapsed() >= config.report_every() {
            sys.refresh_memory();
            let stats = runner.stats();
            info!(
                "generation {} population {} memory {}KB",
                stats.generation,
                stats.current_population,
                sys.used_memory() / 1024
            );
            last_report = Instant::now();
        }
    }
    runner.stop();

    let stats = runner.stats();
    if stats.current_population == 0 {
        warn!("population died out");
    }
    println!(
        "generations: {} population: {} created: {} destroyed: {} elapsed: {:.2?}",
        stats.generation,
        stats.current_population,
        stats.cells_created,
        stats.cells_destroyed,
        started.elapsed()
    );
    Ok(())
}
