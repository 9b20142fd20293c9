//! Exhaustive grid search over the four time-allocation choices.
//!
//! The grid has `points` equally spaced values per variable, so the search
//! evaluates `points^4` allocations. It is meant as a reference solution for
//! validating the continuous solver rather than as the primary method.

use log::debug;
use rayon::prelude::*;

use crate::error::{ModelError, Result};
use crate::household::{HouseholdModel, TimeAllocation};
use crate::options::GridOptions;

/// Best grid point found by [`HouseholdModel::solve_discrete`].
#[derive(Clone, Debug)]
pub struct DiscreteSolution {
    /// Utility-maximising allocation on the grid.
    pub allocation: TimeAllocation,
    /// Utility at `allocation`.
    pub utility: f64,
    /// Total number of grid points evaluated.
    pub grid_points: usize,
    /// Number of grid points satisfying both time constraints.
    pub feasible_points: usize,
}

struct SlabBest {
    allocation: TimeAllocation,
    utility: f64,
    feasible: usize,
}

/// Equally spaced values over `[0, total_time]`, endpoints included.
pub fn grid_values(total_time: f64, points: usize) -> Vec<f64> {
    let last = points.saturating_sub(1).max(1) as f64;
    (0..points)
        .map(|i| total_time * i as f64 / last)
        .collect()
}

impl HouseholdModel {
    /// Solves the model by evaluating every point of the allocation grid.
    ///
    /// Infeasible points are assigned `-inf` utility. Ties are broken in
    /// favour of the first point in `(lm, hm, lf, hf)` lexicographic order.
    pub fn solve_discrete(&self, options: &GridOptions) -> Result<DiscreteSolution> {
        if options.points < 2 {
            return Err(ModelError::invalid_parameter(
                "grid.points",
                options.points as f64,
                "at least two points are required",
            ));
        }

        let values = grid_values(self.params().total_time, options.points);
        let slabs: Vec<SlabBest> = if options.parallel {
            (0..values.len())
                .into_par_iter()
                .map(|lm_index| self.best_in_slab(&values, values[lm_index]))
                .collect()
        } else {
            values
                .iter()
                .map(|lm| self.best_in_slab(&values, *lm))
                .collect()
        };

        let feasible_points = slabs.iter().map(|slab| slab.feasible).sum();
        let mut best = &slabs[0];
        for slab in &slabs[1..] {
            if slab.utility > best.utility {
                best = slab;
            }
        }

        debug!(
            "grid search over {} points: best utility {:.6} at {:?}",
            values.len().pow(4),
            best.utility,
            best.allocation
        );

        Ok(DiscreteSolution {
            allocation: best.allocation,
            utility: best.utility,
            grid_points: values.len().pow(4),
            feasible_points,
        })
    }

    fn best_in_slab(&self, values: &[f64], lm: f64) -> SlabBest {
        let total_time = self.params().total_time;
        let mut allocations = Vec::with_capacity(values.len().pow(3));
        for hm in values {
            for lf in values {
                for hf in values {
                    allocations.push(TimeAllocation::new(lm, *hm, *lf, *hf));
                }
            }
        }

        let mut utilities = self.utilities(&allocations);
        let mut feasible = 0usize;
        for (utility, allocation) in utilities.iter_mut().zip(&allocations) {
            if allocation.male_hours() > total_time || allocation.female_hours() > total_time {
                *utility = f64::NEG_INFINITY;
            } else {
                feasible += 1;
            }
        }

        let mut best_index = 0usize;
        let mut best_utility = f64::NEG_INFINITY;
        for (index, utility) in utilities.iter().enumerate() {
            if *utility > best_utility {
                best_index = index;
                best_utility = *utility;
            }
        }

        SlabBest {
            allocation: allocations[best_index],
            utility: best_utility,
            feasible,
        }
    }
}
