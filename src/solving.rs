//! Optimizer configuration and diagnostics.

use serde::{Deserialize, Serialize};

/// Configuration for the bounded Nelder–Mead simplex search.
#[derive(Clone, Debug)]
pub struct NelderMeadOptions {
    /// Maximum number of simplex iterations; `None` uses `200 * dimension`.
    pub max_iterations: Option<u64>,
    /// Convergence tolerance on the standard deviation of the simplex costs.
    pub sd_tolerance: f64,
    /// Relative perturbation applied to nonzero guess coordinates when building the simplex.
    pub nonzero_step: f64,
    /// Absolute value used for guess coordinates that are exactly zero.
    pub zero_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: None,
            sd_tolerance: 1e-10,
            nonzero_step: 0.05,
            zero_step: 0.000_25,
        }
    }
}

impl NelderMeadOptions {
    /// Caps the number of simplex iterations.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations.max(1));
        self
    }

    /// Overrides the cost standard-deviation tolerance.
    pub fn with_sd_tolerance(mut self, tolerance: f64) -> Self {
        self.sd_tolerance = tolerance;
        self
    }

    /// Iteration cap actually applied for a problem of the given dimension.
    pub fn iteration_limit(&self, dimension: usize) -> u64 {
        self.max_iterations
            .unwrap_or(200 * dimension.max(1) as u64)
    }
}

/// Configuration for Brent's bounded scalar minimisation.
#[derive(Clone, Debug)]
pub struct BrentOptions {
    /// Maximum number of iterations allowed before returning the best point.
    pub max_iterations: u64,
}

impl Default for BrentOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
        }
    }
}

impl BrentOptions {
    /// Caps the number of Brent iterations.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }
}

/// Diagnostics returned alongside every optimizer-based solution.
///
/// The solution point is used whether or not `converged` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Number of iterations performed.
    pub iterations: u64,
    /// Number of objective evaluations reported by the optimizer.
    pub cost_evaluations: u64,
    /// Whether the optimizer stopped because its own convergence criterion was met.
    pub converged: bool,
    /// Human-readable termination status.
    pub termination: String,
}
