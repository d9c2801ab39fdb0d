use std::{fmt, str::FromStr};

use crate::{
    cell::{Cell, ALIVE},
    error::{LifeError, Result},
};

/// Smallest side length accepted by [`Grid::new`] is one more than this.
pub const MIN_SIZE: usize = 8;

/// Square toroidal board of cells stored row-major as sentinel bytes.
///
/// Every index handed to the grid is wrapped modulo the side length in both
/// directions, so there are no edges and every cell has exactly 8 neighbors.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates an all-dead `size` x `size` grid.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::InvalidSize`] if `size` is 8 or less, or too
    /// large for `size * size` cells to be allocated.
    pub fn new(size: usize) -> Result<Self> {
        if size <= MIN_SIZE || size > isize::MAX as usize {
            return Err(LifeError::InvalidSize(size));
        }
        let len = size.checked_mul(size).ok_or(LifeError::InvalidSize(size))?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| LifeError::InvalidSize(size))?;
        cells.resize(len, Cell::Dead.value());
        Ok(Grid { size, cells })
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    fn wrap(&self, i: isize) -> usize {
        i.rem_euclid(self.size as isize) as usize
    }

    fn index(&self, i: isize, j: isize) -> usize {
        self.wrap(i) * self.size + self.wrap(j)
    }

    /// Reads the cell at `(i, j)`.
    ///
    /// # Arguments
    ///
    /// * `i` - Row index, wrapped modulo the side length
    /// * `j` - Column index, wrapped modulo the side length
    pub fn get(&self, i: isize, j: isize) -> Cell {
        Cell::from_value(self.cells[self.index(i, j)])
    }

    /// Writes `cell` at `(i, j)`, wrapping both indices like [`Grid::get`].
    pub fn set(&mut self, i: isize, j: isize, cell: Cell) {
        let idx = self.index(i, j);
        self.cells[idx] = cell.value();
    }

    /// Number of live neighbors of `(i, j)`, in `0..=8`.
    ///
    /// Sums the eight wrapped neighbors' sentinel bytes and divides by
    /// [`ALIVE`].
    pub fn neighbor_sum(&self, i: isize, j: isize) -> u8 {
        let mut total: u16 = 0;
        for di in -1..=1 {
            for dj in -1..=1 {
                if di == 0 && dj == 0 {
                    continue;
                }
                total += u16::from(self.cells[self.index(i + di, j + dj)]);
            }
        }
        (total / u16::from(ALIVE)) as u8
    }

    /// Writes `mask` into the grid with its top-left corner at `top_left`.
    ///
    /// Dead cells in the mask overwrite whatever was underneath. The mask is
    /// not wrapped: it must fit inside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::OutOfBounds`] if the mask would extend past the
    /// last row or column.
    pub fn stamp<R: AsRef<[Cell]>>(
        &mut self,
        top_left: (usize, usize),
        mask: &[R],
    ) -> Result<()> {
        let (row, col) = top_left;
        let height = mask.len();
        let width = mask.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);

        let fits = |start: usize, extent: usize| {
            start
                .checked_add(extent)
                .is_some_and(|end| end <= self.size)
        };
        if !fits(row, height) || !fits(col, width) {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                height,
                width,
                size: self.size,
            });
        }

        for (di, mask_row) in mask.iter().enumerate() {
            for (dj, &cell) in mask_row.as_ref().iter().enumerate() {
                self.cells[(row + di) * self.size + col + dj] = cell.value();
            }
        }
        Ok(())
    }

    /// Deep copy of the current state.
    pub fn clone_snapshot(&self) -> Grid {
        self.clone()
    }

    /// Number of live cells.
    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|&&v| Cell::from_value(v).is_alive()).count() as u64
    }

    /// Raw sentinel bytes, row-major.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Iterates rows of sentinel bytes, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size)
    }

    pub(crate) fn from_cells(size: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Grid { size, cells }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid({}x{})", self.size, self.size)?;
        write!(f, "{self}")
    }
}

/// Renders live cells as `#` and dead cells as `.`, one line per row.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &v in row {
                let c = if Cell::from_value(v).is_alive() { '#' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the text form written by `Display`. Blank lines are skipped.
impl FromStr for Grid {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let size = lines.len();
        let mut grid = Grid::new(size)?;

        for (i, line) in lines.iter().enumerate() {
            if line.chars().count() != size {
                return Err(LifeError::InvalidSize(line.chars().count()));
            }
            for (j, c) in line.chars().enumerate() {
                let cell = Cell::from(!matches!(c, '.' | ' ' | '0'));
                grid.cells[i * size + j] = cell.value();
            }
        }
        Ok(grid)
    }
}
