use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::{
    error::ConfigError,
    grid::{Grid, MIN_SIZE},
    pattern::{self, Pattern, PatternKind},
    runner::RunMode,
};

/// Which execution mode the host program uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    #[default]
    Interactive,
    Headless,
}

/// Start-up parameters, resolved from defaults, an optional YAML file and
/// command-line flags, in that order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Side length of the grid.
    pub grid_size: usize,
    /// Milliseconds between interactive frames.
    pub interval_ms: u64,
    pub pattern: PatternKind,
    /// Live probability for the random pattern.
    pub p_alive: f64,
    /// Fixed RNG seed for a reproducible random fill.
    pub seed: Option<u64>,
    pub mode: ModeKind,
    /// Interactive frame budget, unbounded when absent.
    pub frames: Option<u64>,
    /// Headless runs stop once this generation is reached.
    pub generations: u64,
    /// Milliseconds between headless telemetry reports.
    pub report_every_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: 100,
            interval_ms: 50,
            pattern: PatternKind::Random,
            p_alive: Pattern::DEFAULT_P_ALIVE,
            seed: None,
            mode: ModeKind::Interactive,
            frames: None,
            generations: 1000,
            report_every_ms: 500,
        }
    }
}

/// Values given on the command line. `None` and `false` leave the layer
/// below unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub grid_size: Option<usize>,
    pub interval_ms: Option<u64>,
    pub pattern: Option<PatternKind>,
    pub p_alive: Option<f64>,
    pub seed: Option<u64>,
    pub headless: bool,
    pub frames: Option<u64>,
    pub generations: Option<u64>,
}

impl Config {
    /// Layers defaults, an optional YAML file and `overrides`, then validates
    /// the result.
    ///
    /// # Errors
    ///
    /// Any read, parse or validation error from [`Config::load`] and
    /// [`Config::validate`].
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Replaces every field `overrides` sets.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(n) = overrides.grid_size {
            self.grid_size = n;
        }
        if let Some(ms) = overrides.interval_ms {
            self.interval_ms = ms;
        }
        if let Some(kind) = overrides.pattern {
            self.pattern = kind;
        }
        if let Some(p) = overrides.p_alive {
            self.p_alive = p;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.headless {
            self.mode = ModeKind::Headless;
        }
        if overrides.frames.is_some() {
            self.frames = overrides.frames;
        }
        if let Some(n) = overrides.generations {
            self.generations = n;
        }
    }

    /// Parses YAML text. Missing keys keep their defaults, unknown keys are
    /// rejected.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads a YAML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Checks every field once, before anything is built from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= MIN_SIZE || self.grid_size.checked_mul(self.grid_size).is_none() {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if self.interval_ms == 0 || self.report_every_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        self.pattern().check(self.grid_size)?;
        Ok(())
    }

    /// The seeding strategy, with `p_alive` applied to a random fill.
    pub fn pattern(&self) -> Pattern {
        self.pattern.into_pattern(self.p_alive)
    }

    /// The runner mode, carrying the frame budget for interactive runs.
    pub fn run_mode(&self) -> RunMode {
        match self.mode {
            ModeKind::Interactive => RunMode::Interactive {
                frames: self.frames,
            },
            ModeKind::Headless => RunMode::Headless,
        }
    }

    /// Builds the initial grid this config describes.
    pub fn seed_grid(&self) -> Result<Grid, ConfigError> {
        let grid = match self.seed {
            Some(seed) => pattern::seed_from(self.pattern(), self.grid_size, seed)?,
            None => pattern::seed(self.pattern(), self.grid_size)?,
        };
        Ok(grid)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn report_every(&self) -> Duration {
        Duration::from_millis(self.report_every_ms)
    }
}
