use crate::engine::Census;

/// Running statistics about a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Current generation number
    pub generation: u64,
    /// Total number of cells created since start
    pub cells_created: u64,
    /// Total number of cells destroyed since start
    pub cells_destroyed: u64,
    /// Current number of living cells
    pub current_population: u64,
}

impl Stats {
    /// Starts counting from a seeded grid's population.
    pub fn new(initial_population: u64) -> Self {
        Stats {
            current_population: initial_population,
            ..Stats::default()
        }
    }

    /// Folds one generation's census into the counters.
    pub fn record(&mut self, census: &Census) {
        self.generation += 1;
        self.cells_created += census.births;
        self.cells_destroyed += census.deaths;
        self.current_population = census.population;
    }

    /// Births per generation so far.
    pub fn birth_rate(&self) -> f64 {
        self.cells_created as f64 / self.generation.max(1) as f64
    }

    /// Deaths per generation so far.
    pub fn death_rate(&self) -> f64 {
        self.cells_destroyed as f64 / self.generation.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_before_first_generation_are_zero() {
        let stats = Stats::new(10);
        assert_eq!(stats.birth_rate(), 0.0);
        assert_eq!(stats.death_rate(), 0.0);
        assert_eq!(stats.current_population, 10);
    }

    #[test]
    fn record_accumulates() {
        let mut stats = Stats::new(3);
        stats.record(&Census {
            births: 2,
            deaths: 2,
            population: 3,
        });
        stats.record(&Census {
            births: 4,
            deaths: 0,
            population: 7,
        });
        assert_eq!(stats.generation, 2);
        assert_eq!(stats.cells_created, 6);
        assert_eq!(stats.cells_destroyed, 2);
        assert_eq!(stats.current_population, 7);
        assert_eq!(stats.birth_rate(), 3.0);
        assert_eq!(stats.death_rate(), 1.0);
    }
}
