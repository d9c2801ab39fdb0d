use std::{
    panic,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
};

use log::{debug, info};

use crate::{
    engine::{self, Census},
    error::{LifeError, Result},
    grid::Grid,
    stats::Stats,
};

/// How generations are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// An external driver calls [`Runner::advance_one_frame`] once per frame.
    /// `frames` bounds how many frames are produced; `None` means unbounded.
    Interactive { frames: Option<u64> },
    /// A background worker steps as fast as it can until stopped.
    Headless,
}

/// Lifecycle of a [`Runner`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Idle,
    Running,
    Stopped,
}

/// A strategy for pacing generations.
pub trait Pacing {
    /// Produces the generation after `grid`.
    fn drive_generation(&mut self, grid: &Grid) -> (Grid, Census);
    /// Whether another generation should be driven.
    fn should_continue(&self) -> bool;
}

/// Interactive pacing: one generation per frame, optionally bounded.
#[derive(Debug, Clone, Copy)]
pub struct FrameBudget {
    remaining: Option<u64>,
}

impl FrameBudget {
    /// A budget of `frames` frames, or an unbounded one for `None`.
    pub fn new(frames: Option<u64>) -> Self {
        FrameBudget { remaining: frames }
    }

    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }
}

impl Pacing for FrameBudget {
    fn drive_generation(&mut self, grid: &Grid) -> (Grid, Census) {
        if let Some(n) = self.remaining.as_mut() {
            *n = n.saturating_sub(1);
        }
        engine::evolve(grid)
    }

    fn should_continue(&self) -> bool {
        self.remaining != Some(0)
    }
}

/// Headless pacing: keep going until the shared flag is raised.
#[derive(Debug, Clone)]
pub struct StopSignal {
    stop: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new(stop: Arc<AtomicBool>) -> Self {
        StopSignal { stop }
    }
}

impl Pacing for StopSignal {
    fn drive_generation(&mut self, grid: &Grid) -> (Grid, Census) {
        engine::evolve(grid)
    }

    fn should_continue(&self) -> bool {
        !self.stop.load(Ordering::Acquire)
    }
}

/// The latest committed generation, as visible to readers.
#[derive(Debug, Clone)]
struct Published {
    grid: Grid,
    stats: Stats,
}

/// Owns a grid and drives it generation by generation.
///
/// In headless mode the worker thread owns the live grid and publishes a
/// copy after each generation; [`snapshot`](Runner::snapshot) only holds
/// the lock long enough to clone that copy.
pub struct Runner {
    mode: RunMode,
    state: SimulationState,
    published: Arc<Mutex<Published>>,
    frames: FrameBudget,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Runner {
    /// Creates an idle runner that owns `grid`.
    ///
    /// # Arguments
    ///
    /// * `grid` - The seeded first generation
    /// * `mode` - Whether frames are driven externally or by a background worker
    pub fn new(grid: Grid, mode: RunMode) -> Self {
        let frames = match mode {
            RunMode::Interactive { frames } => FrameBudget::new(frames),
            RunMode::Headless => FrameBudget::new(None),
        };
        let stats = Stats::new(grid.population());
        Runner {
            mode,
            state: SimulationState::Idle,
            published: Arc::new(Mutex::new(Published { grid, stats })),
            frames,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Starts the simulation.
    ///
    /// Interactive runners just move to `Running`, and repeated calls are
    /// no-ops. Headless runners spawn their worker.
    ///
    /// # Errors
    ///
    /// [`LifeError::AlreadyRunning`] if a headless worker is already running.
    pub fn start(&mut self) -> Result<()> {
        match (self.mode, self.state) {
            (_, SimulationState::Stopped) => {
                debug!("start ignored, runner already stopped");
                Ok(())
            }
            (RunMode::Interactive { .. }, SimulationState::Running) => Ok(()),
            (RunMode::Headless, SimulationState::Running) => Err(LifeError::AlreadyRunning),
            (RunMode::Interactive { .. }, SimulationState::Idle) => {
                debug!("interactive runner started");
                self.state = SimulationState::Running;
                Ok(())
            }
            (RunMode::Headless, SimulationState::Idle) => self.spawn_worker(),
        }
    }

    fn spawn_worker(&mut self) -> Result<()> {
        let published = Arc::clone(&self.published);
        let pacing = StopSignal::new(Arc::clone(&self.stop));
        self.stop.store(false, Ordering::Release);

        let handle = thread::Builder::new()
            .name("game_of_life".into())
            .spawn(move || run_worker(pacing, published))
            .map_err(|e| LifeError::WorkerSpawn(e.to_string()))?;

        info!("headless worker started");
        self.worker = Some(handle);
        self.state = SimulationState::Running;
        Ok(())
    }

    /// Stops the simulation, waiting for a headless worker to exit.
    ///
    /// The worker finishes the generation it is computing first. Stopping a
    /// runner that is not running does nothing.
    ///
    /// # Panics
    ///
    /// Re-raises a panic that occurred on the worker thread.
    pub fn stop(&mut self) {
        if self.state != SimulationState::Running {
            debug!("stop ignored, runner is {:?}", self.state);
            return;
        }
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.worker.take() {
            if let Err(payload) = handle.join() {
                self.state = SimulationState::Stopped;
                panic::resume_unwind(payload);
            }
            info!("headless worker stopped at generation {}", self.generation());
        }
        self.state = SimulationState::Stopped;
    }

    /// Advances one generation and returns it for rendering.
    ///
    /// Works while idle too, which lets a paused view single-step. Once a
    /// bounded budget is spent no further frames are produced; a `Running`
    /// runner then moves to `Stopped`, an idle one stays `Idle`.
    ///
    /// # Errors
    ///
    /// [`LifeError::WrongMode`] on a headless runner, [`LifeError::Stopped`]
    /// once the runner has stopped or its frame budget is spent.
    pub fn advance_one_frame(&mut self) -> Result<Grid> {
        if self.mode == RunMode::Headless {
            return Err(LifeError::WrongMode);
        }
        if self.state == SimulationState::Stopped {
            return Err(LifeError::Stopped);
        }
        if !self.frames.should_continue() {
            self.finish_budget();
            return Err(LifeError::Stopped);
        }

        let mut published = lock(&self.published);
        let (next, census) = self.frames.drive_generation(&published.grid);
        published.grid = next;
        published.stats.record(&census);
        let frame = published.grid.clone_snapshot();
        drop(published);

        if !self.frames.should_continue() {
            self.finish_budget();
        }
        Ok(frame)
    }

    fn finish_budget(&mut self) {
        debug!("frame budget used up while {:?}", self.state);
        if self.state == SimulationState::Running {
            self.state = SimulationState::Stopped;
        }
    }

    /// Copy of the most recently committed generation.
    pub fn snapshot(&self) -> Grid {
        lock(&self.published).grid.clone_snapshot()
    }

    /// Live cells in the most recently committed generation.
    pub fn population(&self) -> u64 {
        lock(&self.published).stats.current_population
    }

    /// Number of generations committed since the runner was created.
    pub fn generation(&self) -> u64 {
        lock(&self.published).stats.generation
    }

    /// Counters for the most recently committed generation.
    pub fn stats(&self) -> Stats {
        lock(&self.published).stats
    }

    /// Frames left in an interactive budget, `None` when unbounded.
    pub fn frames_remaining(&self) -> Option<u64> {
        self.frames.remaining()
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.take() {
            self.stop.store(true, Ordering::Release);
            let _ = handle.join();
        }
    }
}

fn run_worker<P: Pacing>(mut pacing: P, published: Arc<Mutex<Published>>) {
    let Published { mut grid, mut stats } = lock(&published).clone();
    while pacing.should_continue() {
        let (next, census) = pacing.drive_generation(&grid);
        grid = next;
        stats.record(&census);

        let mut shared = lock(&published);
        shared.grid.clone_from(&grid);
        shared.stats = stats;
    }
}

// Published state is a plain copy, so a poisoned lock still holds a usable value.
fn lock(published: &Mutex<Published>) -> MutexGuard<'_, Published> {
    published.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;
    use crate::pattern::{self, Pattern};

    fn glider_grid() -> Grid {
        pattern::seed(Pattern::DEFAULT_GLIDER, 20).unwrap()
    }

    #[test]
    fn stop_before_start_stays_idle() {
        let mut runner = Runner::new(glider_grid(), RunMode::Headless);
        runner.stop();
        assert_eq!(runner.state(), SimulationState::Idle);

        let mut runner = Runner::new(glider_grid(), RunMode::Interactive { frames: None });
        runner.stop();
        assert_eq!(runner.state(), SimulationState::Idle);
    }

    #[test]
    fn interactive_start_is_idempotent() {
        let mut runner = Runner::new(glider_grid(), RunMode::Interactive { frames: None });
        runner.start().unwrap();
        runner.start().unwrap();
        assert_eq!(runner.state(), SimulationState::Running);
        runner.stop();
        assert_eq!(runner.state(), SimulationState::Stopped);
        runner.start().unwrap();
        assert_eq!(runner.state(), SimulationState::Stopped);
        runner.stop();
        assert_eq!(runner.state(), SimulationState::Stopped);
    }

    #[test]
    fn advance_returns_next_generation() {
        let grid = glider_grid();
        let expected = engine::step(&grid);
        let mut runner = Runner::new(grid, RunMode::Interactive { frames: None });
        let frame = runner.advance_one_frame().unwrap();
        assert_eq!(frame, expected);
        assert_eq!(runner.snapshot(), expected);
        assert_eq!(runner.generation(), 1);
        assert_eq!(runner.population(), 5);
    }

    #[test]
    fn spent_budget_leaves_idle_runner_idle() {
        let mut runner = Runner::new(glider_grid(), RunMode::Interactive { frames: Some(1) });
        runner.advance_one_frame().unwrap();
        assert_eq!(runner.state(), SimulationState::Idle);
        assert_eq!(runner.frames_remaining(), Some(0));
        assert_eq!(runner.advance_one_frame(), Err(LifeError::Stopped));
        assert_eq!(runner.state(), SimulationState::Idle);
        assert_eq!(runner.generation(), 1);

        runner.start().unwrap();
        assert_eq!(runner.state(), SimulationState::Running);
        assert_eq!(runner.advance_one_frame(), Err(LifeError::Stopped));
        assert_eq!(runner.state(), SimulationState::Stopped);
    }

    #[test]
    fn frame_budget_stops_runner() {
        let mut runner = Runner::new(glider_grid(), RunMode::Interactive { frames: Some(2) });
        runner.start().unwrap();
        runner.advance_one_frame().unwrap();
        assert_eq!(runner.frames_remaining(), Some(1));
        runner.advance_one_frame().unwrap();
        assert_eq!(runner.state(), SimulationState::Stopped);
        assert_eq!(runner.advance_one_frame(), Err(LifeError::Stopped));
        assert_eq!(runner.generation(), 2);
    }

    #[test]
    fn advance_after_stop_fails() {
        let mut runner = Runner::new(glider_grid(), RunMode::Interactive { frames: None });
        runner.start().unwrap();
        runner.stop();
        assert_eq!(runner.advance_one_frame(), Err(LifeError::Stopped));
    }

    #[test]
    fn headless_rejects_frames() {
        let mut runner = Runner::new(glider_grid(), RunMode::Headless);
        assert_eq!(runner.advance_one_frame(), Err(LifeError::WrongMode));
    }

    #[test]
    fn headless_runs_until_stopped() {
        let mut runner = Runner::new(glider_grid(), RunMode::Headless);
        runner.start().unwrap();
        assert_eq!(runner.start(), Err(LifeError::AlreadyRunning));

        while runner.generation() < 8 {
            thread::sleep(Duration::from_millis(1));
        }
        runner.stop();
        assert_eq!(runner.state(), SimulationState::Stopped);

        let generation = runner.generation();
        let snapshot = runner.snapshot();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(runner.generation(), generation);
        assert_eq!(runner.snapshot(), snapshot);
        assert_eq!(runner.population(), 5);

        runner.start().unwrap();
        assert_eq!(runner.state(), SimulationState::Stopped);
    }

    #[test]
    fn drop_joins_running_worker() {
        let mut runner = Runner::new(glider_grid(), RunMode::Headless);
        runner.start().unwrap();
        drop(runner);
    }

    #[test]
    fn frame_budget_counts_down() {
        let mut budget = FrameBudget::new(Some(1));
        let grid = glider_grid();
        assert!(budget.should_continue());
        let (next, census) = budget.drive_generation(&grid);
        assert_eq!(next, engine::step(&grid));
        assert_eq!(census.population, next.population());
        assert!(!budget.should_continue());

        let unbounded = FrameBudget::new(None);
        assert!(unbounded.should_continue());
    }

    #[test]
    fn stop_signal_follows_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let signal = StopSignal::new(Arc::clone(&flag));
        assert!(signal.should_continue());
        flag.store(true, Ordering::Release);
        assert!(!signal.should_continue());
    }
}
