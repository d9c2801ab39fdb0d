use std::str::FromStr;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

use crate::{
    cell::Cell,
    error::{ConfigError, LifeError, Result},
    grid::Grid,
};

const D: Cell = Cell::Dead;
const A: Cell = Cell::Alive;

/// 3x3 glider heading down and to the right.
pub const GLIDER: [[Cell; 3]; 3] = [[D, D, A], [A, D, A], [D, A, A]];

pub const GOSPER_GUN_HEIGHT: usize = 11;
pub const GOSPER_GUN_WIDTH: usize = 38;

/// Live cells of the Gosper glider gun inside its 11x38 frame.
#[rustfmt::skip]
pub const GOSPER_GUN_CELLS: [(usize, usize); 36] = [
    // left block
    (5, 1), (5, 2), (6, 1), (6, 2),
    // left ship
    (3, 13), (3, 14), (4, 12), (4, 16), (5, 11), (5, 17),
    (6, 11), (6, 15), (6, 17), (6, 18), (7, 11), (7, 17),
    (8, 12), (8, 16), (9, 13), (9, 14),
    // right ship
    (1, 25), (2, 23), (2, 25), (3, 21), (3, 22), (4, 21),
    (4, 22), (5, 21), (5, 22), (6, 23), (6, 25), (7, 25),
    // right block
    (3, 35), (3, 36), (4, 35), (4, 36),
];

/// The 11x38 Gosper glider gun mask.
pub fn gosper_gun_mask() -> [[Cell; GOSPER_GUN_WIDTH]; GOSPER_GUN_HEIGHT] {
    let mut mask = [[Cell::Dead; GOSPER_GUN_WIDTH]; GOSPER_GUN_HEIGHT];
    for &(i, j) in GOSPER_GUN_CELLS.iter() {
        mask[i][j] = Cell::Alive;
    }
    mask
}

/// How to fill a fresh grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern {
    /// Every cell alive independently with probability `p_alive`.
    Random { p_alive: f64 },
    /// A glider with its top-left corner at `(row, col)`.
    Glider { row: usize, col: usize },
    /// A Gosper glider gun with its top-left corner at `(row, col)`.
    GosperGun { row: usize, col: usize },
    Empty,
}

impl Pattern {
    pub const DEFAULT_P_ALIVE: f64 = 0.2;
    pub const DEFAULT_GLIDER: Pattern = Pattern::Glider { row: 1, col: 1 };
    pub const DEFAULT_GOSPER_GUN: Pattern = Pattern::GosperGun { row: 10, col: 10 };

    /// Checks that this pattern can seed a `size` x `size` grid without
    /// building one.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidProbability`] for a random fill outside `[0, 1]`,
    /// [`LifeError::OutOfBounds`] for a stamp that runs past the grid edge.
    pub fn check(&self, size: usize) -> Result<()> {
        let (row, col, height, width) = match *self {
            Pattern::Random { p_alive } if !(0.0..=1.0).contains(&p_alive) => {
                return Err(LifeError::InvalidProbability(p_alive));
            }
            Pattern::Random { .. } | Pattern::Empty => return Ok(()),
            Pattern::Glider { row, col } => (row, col, GLIDER.len(), GLIDER[0].len()),
            Pattern::GosperGun { row, col } => (row, col, GOSPER_GUN_HEIGHT, GOSPER_GUN_WIDTH),
        };
        let fits = |start: usize, extent: usize| {
            start.checked_add(extent).is_some_and(|end| end <= size)
        };
        if fits(row, height) && fits(col, width) {
            Ok(())
        } else {
            Err(LifeError::OutOfBounds {
                row,
                col,
                height,
                width,
                size,
            })
        }
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Random {
            p_alive: Pattern::DEFAULT_P_ALIVE,
        }
    }
}

/// Pattern names as they appear on the command line and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    #[default]
    Random,
    Glider,
    Gosper,
    Empty,
}

impl PatternKind {
    /// Builds the pattern at its conventional offset.
    pub fn into_pattern(self, p_alive: f64) -> Pattern {
        match self {
            PatternKind::Random => Pattern::Random { p_alive },
            PatternKind::Glider => Pattern::DEFAULT_GLIDER,
            PatternKind::Gosper => Pattern::DEFAULT_GOSPER_GUN,
            PatternKind::Empty => Pattern::Empty,
        }
    }
}

impl FromStr for PatternKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(PatternKind::Random),
            "glider" => Ok(PatternKind::Glider),
            "gosper" | "gosper-gun" | "gun" => Ok(PatternKind::Gosper),
            "empty" => Ok(PatternKind::Empty),
            _ => Err(ConfigError::UnknownPattern(s.to_string())),
        }
    }
}

/// Seeds a `size` x `size` grid, drawing randomness from the OS.
pub fn seed(pattern: Pattern, size: usize) -> Result<Grid> {
    seed_with_rng(pattern, size, &mut StdRng::from_entropy())
}

/// Reproducible form of [`seed`].
pub fn seed_from(pattern: Pattern, size: usize, seed: u64) -> Result<Grid> {
    seed_with_rng(pattern, size, &mut StdRng::seed_from_u64(seed))
}

/// Seeds a `size` x `size` grid from the given random source.
///
/// # Arguments
///
/// * `pattern` - The seeding strategy
/// * `size` - Side length of the grid, greater than 8
/// * `rng` - Source of randomness for [`Pattern::Random`]
///
/// # Errors
///
/// Returns the grid size, probability and stamp errors of [`Grid::new`] and
/// [`Pattern::check`].
pub fn seed_with_rng<R: Rng>(pattern: Pattern, size: usize, rng: &mut R) -> Result<Grid> {
    let mut grid = Grid::new(size)?;
    pattern.check(size)?;
    match pattern {
        Pattern::Random { p_alive } => {
            for i in 0..size as isize {
                for j in 0..size as isize {
                    grid.set(i, j, Cell::from(rng.gen_bool(p_alive)));
                }
            }
        }
        Pattern::Glider { row, col } => grid.stamp((row, col), &GLIDER)?,
        Pattern::GosperGun { row, col } => grid.stamp((row, col), &gosper_gun_mask())?,
        Pattern::Empty => {}
    }
    Ok(grid)
}
