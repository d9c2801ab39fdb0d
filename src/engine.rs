use rayon::prelude::*;

use crate::{cell::Cell, grid::Grid};

/// Cell changes made by one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub births: u64,
    pub deaths: u64,
    /// Live cells after the generation.
    pub population: u64,
}

/// Applies the B3/S23 rule to a single cell.
///
/// * A live cell with fewer than two or more than three live neighbors dies
/// * A dead cell with exactly three live neighbors becomes alive
/// * Every other cell keeps its state
pub fn rule(cell: Cell, live_neighbors: u8) -> Cell {
    match (cell, live_neighbors) {
        (Cell::Alive, n) if n < 2 || n > 3 => Cell::Dead,
        (Cell::Dead, 3) => Cell::Alive,
        (otherwise, _) => otherwise,
    }
}

/// Computes the next generation of `current`.
///
/// Every cell is evaluated against the frozen `current` grid, so no write
/// made during a step can be seen by a neighbor in the same step.
pub fn step(current: &Grid) -> Grid {
    evolve(current).0
}

/// Like [`step`], also reporting how many cells were born and died.
pub fn evolve(current: &Grid) -> (Grid, Census) {
    let size = current.size();
    let mut next = current.cells().to_vec();

    let census = next
        .par_chunks_mut(size)
        .enumerate()
        .map(|(i, row)| {
            let mut census = Census::default();
            for (j, slot) in row.iter_mut().enumerate() {
                let (i, j) = (i as isize, j as isize);
                let cell = current.get(i, j);
                let next_cell = rule(cell, current.neighbor_sum(i, j));
                match (cell, next_cell) {
                    (Cell::Dead, Cell::Alive) => census.births += 1,
                    (Cell::Alive, Cell::Dead) => census.deaths += 1,
                    _ => {}
                }
                if next_cell.is_alive() {
                    census.population += 1;
                }
                *slot = next_cell.value();
            }
            census
        })
        .reduce(Census::default, |a, b| Census {
            births: a.births + b.births,
            deaths: a.deaths + b.deaths,
            population: a.population + b.population,
        });

    (Grid::from_cells(size, next), census)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn rule_table() {
        for n in 0..=8 {
            let survives = n == 2 || n == 3;
            assert_eq!(rule(Cell::Alive, n).is_alive(), survives, "alive with {n}");
            assert_eq!(rule(Cell::Dead, n).is_alive(), n == 3, "dead with {n}");
        }
    }

    #[test]
    fn step_leaves_input_untouched() {
        let start = grid(
            ".........\n\
             .........\n\
             .........\n\
             ...###...\n\
             .........\n\
             .........\n\
             .........\n\
             .........\n\
             .........\n",
        );
        let copy = start.clone();
        let next = step(&start);
        assert_eq!(start, copy);
        assert_ne!(next, start);
    }

    #[test]
    fn census_counts_changes() {
        let blinker = grid(
            ".........\n\
             .........\n\
             .........\n\
             ...###...\n\
             .........\n\
             .........\n\
             .........\n\
             .........\n\
             .........\n",
        );
        let (next, census) = evolve(&blinker);
        assert_eq!(
            census,
            Census {
                births: 2,
                deaths: 2,
                population: 3
            }
        );
        assert_eq!(next.population(), census.population);
    }

    #[test]
    fn lonely_cell_dies() {
        let mut g = Grid::new(9).unwrap();
        g.set(4, 4, Cell::Alive);
        assert_eq!(step(&g).population(), 0);
    }

    #[test]
    fn full_grid_dies_of_overcrowding() {
        let mut g = Grid::new(9).unwrap();
        for i in 0..9 {
            for j in 0..9 {
                g.set(i, j, Cell::Alive);
            }
        }
        let (next, census) = evolve(&g);
        assert_eq!(next.population(), 0);
        assert_eq!(census.deaths, 81);
    }
}
