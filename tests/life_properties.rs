use std::{thread, time::Duration};

use toroid_life::{
    engine::{evolve, step},
    pattern, Cell, Grid, Pattern, RunMode, Runner, SimulationState,
};

fn run(grid: &Grid, generations: usize) -> Grid {
    (0..generations).fold(grid.clone(), |g, _| step(&g))
}

fn blinker(vertical: bool) -> Grid {
    let mut grid = Grid::new(11).unwrap();
    for k in 4..=6 {
        if vertical {
            grid.set(k, 5, Cell::Alive);
        } else {
            grid.set(5, k, Cell::Alive);
        }
    }
    grid
}

#[test]
fn wrap_counts_diagonal_neighbor() {
    for n in [9, 10, 37] {
        let mut grid = Grid::new(n).unwrap();
        grid.set(0, 0, Cell::Alive);
        let last = n as isize - 1;
        assert_eq!(grid.neighbor_sum(last, last), 1, "size {n}");
    }
}

#[test]
fn block_is_still_life() {
    let mut grid = Grid::new(10).unwrap();
    grid.stamp((4, 4), &[[Cell::Alive; 2]; 2]).unwrap();
    for generations in [1, 2, 7, 50] {
        assert_eq!(run(&grid, generations), grid);
    }
}

#[test]
fn blinker_oscillates_with_period_two() {
    let horizontal = blinker(false);
    assert_eq!(step(&horizontal), blinker(true));
    assert_eq!(run(&horizontal, 2), horizontal);
}

#[test]
fn glider_moves_diagonally_every_four_generations() {
    let start = pattern::seed(Pattern::Glider { row: 1, col: 1 }, 20).unwrap();
    let moved = pattern::seed(Pattern::Glider { row: 2, col: 2 }, 20).unwrap();
    assert_eq!(run(&start, 4), moved);
}

#[test]
fn glider_wraps_around_small_grid() {
    let n = 9;
    let start = pattern::seed(Pattern::Glider { row: 1, col: 1 }, n).unwrap();
    let after = run(&start, 4 * n);
    assert_eq!(after, start);
}

#[test]
fn gosper_gun_emits_gliders() {
    let gun = pattern::seed(Pattern::DEFAULT_GOSPER_GUN, 50).unwrap();
    assert_eq!(gun.population(), 36);
    let later = run(&gun, 30);
    assert!(later.population() > gun.population(), "population {}", later.population());
}

// Updating cells in place, row by row, lets earlier writes leak into
// later neighbor counts.
fn in_place_step(grid: &mut Grid) {
    let n = grid.size() as isize;
    for i in 0..n {
        for j in 0..n {
            let next = toroid_life::engine::rule(grid.get(i, j), grid.neighbor_sum(i, j));
            grid.set(i, j, next);
        }
    }
}

#[test]
fn step_reads_only_the_previous_generation() {
    let start = blinker(false);
    let mut naive = start.clone();
    in_place_step(&mut naive);

    let next = step(&start);
    assert_ne!(naive, next);
    assert_eq!(next, blinker(true));
}

#[test]
fn census_matches_population() {
    let grid = pattern::seed_from(Pattern::default(), 40, 3).unwrap();
    let (next, census) = evolve(&grid);
    assert_eq!(census.population, next.population());
    assert_eq!(
        grid.population() + census.births - census.deaths,
        next.population()
    );
}

#[test]
fn interactive_frames_follow_engine() {
    let grid = pattern::seed_from(Pattern::default(), 30, 11).unwrap();
    let mut runner = Runner::new(grid.clone(), RunMode::Interactive { frames: Some(5) });
    runner.start().unwrap();

    let mut expected = grid;
    while runner.state() == SimulationState::Running {
        expected = step(&expected);
        assert_eq!(runner.advance_one_frame().unwrap(), expected);
    }
    assert_eq!(runner.generation(), 5);
    assert_eq!(runner.population(), expected.population());
}

#[test]
fn headless_snapshots_are_whole_generations() {
    let grid = pattern::seed(Pattern::Glider { row: 3, col: 3 }, 16).unwrap();
    let mut runner = Runner::new(grid, RunMode::Headless);
    runner.start().unwrap();

    for _ in 0..20 {
        assert_eq!(runner.snapshot().population(), 5);
        thread::sleep(Duration::from_millis(1));
    }
    while runner.generation() < 64 {
        thread::sleep(Duration::from_millis(1));
    }
    runner.stop();

    let generation = runner.generation() as usize;
    let start = pattern::seed(Pattern::Glider { row: 3, col: 3 }, 16).unwrap();
    assert_eq!(runner.snapshot(), run(&start, generation));
    assert_eq!(runner.population(), 5);
}
