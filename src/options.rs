//! Solver configuration for the household and union models.

use crate::solving::{BrentOptions, NelderMeadOptions};

/// Controls the exhaustive grid search.
#[derive(Clone, Debug)]
pub struct GridOptions {
    /// Number of equally spaced values per choice variable over `[0, total_time]`.
    pub points: usize,
    /// Evaluate grid slabs on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            points: 49,
            parallel: false,
        }
    }
}

impl GridOptions {
    /// Overrides the grid resolution.
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Enable or disable parallel slab evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Aggregated configuration for solving the household model.
#[derive(Clone, Debug)]
pub struct HouseholdOptions {
    /// Settings for the discrete solver.
    pub grid: GridOptions,
    /// Settings for the continuous simplex solver.
    pub simplex: NelderMeadOptions,
    /// Starting point `[lm, hm, lf, hf]` of the continuous solver.
    pub initial_guess: [f64; 4],
    /// Solve the points of a wage sweep on the rayon thread pool.
    pub parallel_sweep: bool,
}

impl Default for HouseholdOptions {
    fn default() -> Self {
        Self {
            grid: GridOptions::default(),
            simplex: NelderMeadOptions::default(),
            initial_guess: [4.0; 4],
            parallel_sweep: false,
        }
    }
}

impl HouseholdOptions {
    /// Override the grid settings while preserving other defaults.
    pub fn with_grid(mut self, grid: GridOptions) -> Self {
        self.grid = grid;
        self
    }

    /// Override the simplex settings while preserving other defaults.
    pub fn with_simplex(mut self, simplex: NelderMeadOptions) -> Self {
        self.simplex = simplex;
        self
    }

    /// Set the starting point of the continuous solver.
    pub fn with_initial_guess(mut self, guess: [f64; 4]) -> Self {
        self.initial_guess = guess;
        self
    }

    /// Enable or disable parallel wage sweeps.
    pub fn with_parallel_sweep(mut self, parallel: bool) -> Self {
        self.parallel_sweep = parallel;
        self
    }
}

/// Controls the outer moment-matching search.
#[derive(Clone, Debug)]
pub struct CalibrationOptions {
    /// Settings for the inner household solves.
    pub household: HouseholdOptions,
    /// Settings for the outer simplex over structural parameters.
    pub simplex: NelderMeadOptions,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        Self {
            household: HouseholdOptions::default(),
            simplex: NelderMeadOptions::default(),
        }
    }
}

impl CalibrationOptions {
    /// Override the inner household settings.
    pub fn with_household(mut self, household: HouseholdOptions) -> Self {
        self.household = household;
        self
    }

    /// Override the outer simplex settings.
    pub fn with_simplex(mut self, simplex: NelderMeadOptions) -> Self {
        self.simplex = simplex;
        self
    }
}

/// Controls the union wage search.
#[derive(Clone, Debug)]
pub struct UnionOptions {
    /// Strictly positive wage interval searched by the solver.
    pub wage_interval: (f64, f64),
    /// Settings for Brent's method.
    pub brent: BrentOptions,
}

impl Default for UnionOptions {
    fn default() -> Self {
        Self {
            wage_interval: (1e-4, 100.0),
            brent: BrentOptions::default(),
        }
    }
}

impl UnionOptions {
    /// Override the wage interval.
    pub fn with_wage_interval(mut self, lower: f64, upper: f64) -> Self {
        self.wage_interval = (lower, upper);
        self
    }

    /// Override Brent's settings.
    pub fn with_brent(mut self, brent: BrentOptions) -> Self {
        self.brent = brent;
        self
    }
}
