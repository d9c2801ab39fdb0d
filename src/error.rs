use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised by the simulation core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifeError {
    /// Grid side must be larger than the smallest stamp needs.
    #[error("grid size {0} is too small, it must be greater than 8")]
    InvalidSize(usize),
    /// A stamp would run past the grid edge.
    #[error("a {height}x{width} stamp at ({row}, {col}) does not fit a {size}x{size} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
        size: usize,
    },
    #[error("live-cell probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    /// A headless worker is already running for this runner.
    #[error("simulation is already running")]
    AlreadyRunning,
    #[error("operation is not available in this run mode")]
    WrongMode,
    #[error("simulation has been stopped")]
    Stopped,
    #[error("unable to spawn simulation worker: {0}")]
    WorkerSpawn(String),
}

/// Errors raised while resolving the host program's configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("grid size {0} must be greater than 8")]
    InvalidGridSize(usize),
    #[error("frame interval must be at least 1ms")]
    InvalidInterval,
    #[error("unknown pattern {0:?}, expected random, glider, gosper or empty")]
    UnknownPattern(String),
    #[error(transparent)]
    Life(#[from] LifeError),
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;
