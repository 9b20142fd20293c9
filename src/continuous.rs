//! Continuous solution of the household problem with a bounded simplex search.

use log::debug;

use crate::error::Result;
use crate::household::{HouseholdModel, TimeAllocation};
use crate::optimizer::{minimize_bounded, Bounds};
use crate::options::HouseholdOptions;
use crate::solving::SolveSummary;

/// Allocation returned by [`HouseholdModel::solve`].
#[derive(Clone, Debug)]
pub struct ContinuousSolution {
    /// Optimal allocation reported by the simplex search.
    pub allocation: TimeAllocation,
    /// Utility at `allocation`.
    pub utility: f64,
    /// Utility at the (clipped) initial guess.
    pub initial_utility: f64,
    /// Optimizer diagnostics.
    pub summary: SolveSummary,
}

impl HouseholdModel {
    /// Maximises utility over the four choices, each boxed to `[0, total_time]`.
    ///
    /// The search starts from `options.initial_guess` and returns the local
    /// optimum it finds; different guesses may produce different answers.
    /// The joint time constraints are not imposed here, only the boxes.
    pub fn solve(&self, options: &HouseholdOptions) -> Result<ContinuousSolution> {
        let bounds = [Bounds::new(0.0, self.params().total_time)?; 4];
        let objective =
            |x: &[f64]| -> Result<f64> { Ok(-self.utility(&TimeAllocation::from_slice(x))) };

        let guess: Vec<f64> = options
            .initial_guess
            .iter()
            .zip(&bounds)
            .map(|(value, bound)| bound.clamp(*value))
            .collect();
        let initial_utility = self.utility(&TimeAllocation::from_slice(&guess));

        let minimum = minimize_bounded(&objective, &guess, &bounds, &options.simplex)?;
        let allocation = TimeAllocation::from_slice(&minimum.point);
        let utility = self.utility(&allocation);

        debug!(
            "continuous solve at wf = {}: {:?} with utility {:.6}",
            self.params().wf,
            allocation,
            utility
        );

        Ok(ContinuousSolution {
            allocation,
            utility,
            initial_utility,
            summary: minimum.summary,
        })
    }
}
