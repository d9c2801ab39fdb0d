//! # Toroidal Life
//!
//! Conway's Game of Life on a fixed-size toroidal grid.
//!
//! ## Features
//!
//! * Sentinel-encoded square grid with wrap-around neighbor counting
//! * Random, glider, Gosper glider gun and empty seeding
//! * Double-buffered B3/S23 generation step, rows computed in parallel
//! * A runner that is either stepped frame by frame or runs headless on a
//!   background thread until stopped
//!
//! ```
//! use toroid_life::{pattern, Pattern, Runner, RunMode};
//!
//! let grid = pattern::seed(Pattern::DEFAULT_GLIDER, 20)?;
//! let mut runner = Runner::new(grid, RunMode::Interactive { frames: Some(4) });
//! runner.start()?;
//! for _ in 0..4 {
//!     runner.advance_one_frame()?;
//! }
//! assert_eq!(runner.population(), 5);
//! # Ok::<(), toroid_life::LifeError>(())
//! ```

pub mod cell;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod pattern;
pub mod runner;
pub mod stats;

pub use cell::Cell;
pub use config::{Config, Overrides};
pub use engine::{step, Census};
pub use error::{ConfigError, LifeError, Result};
pub use grid::Grid;
pub use pattern::Pattern;
pub use runner::{Pacing, RunMode, Runner, SimulationState};
pub use stats::Stats;
