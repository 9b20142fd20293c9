//! Re-solving the household model across a grid of female wages.

use log::debug;
use nalgebra::DVector;
use rayon::prelude::*;

use crate::continuous::ContinuousSolution;
use crate::error::{ModelError, Result};
use crate::household::HouseholdModel;
use crate::options::HouseholdOptions;
use crate::regression::{fit_log_ratio, LogRatioRegression};

/// `n` equally spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Female wages used by the baseline regression: five points from 0.8 to 1.2.
pub fn default_female_wages() -> Vec<f64> {
    linspace(0.8, 1.2, 5)
}

/// Optimal allocations for every wage of a sweep, stored in parallel vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct WageSweep {
    /// Female wage at each sweep point.
    pub wf: DVector<f64>,
    /// Female-to-male wage ratio at each sweep point.
    pub relative_wage: DVector<f64>,
    /// Optimal male market hours.
    pub lm: DVector<f64>,
    /// Optimal male home hours.
    pub hm: DVector<f64>,
    /// Optimal female market hours.
    pub lf: DVector<f64>,
    /// Optimal female home hours.
    pub hf: DVector<f64>,
}

impl WageSweep {
    /// Number of sweep points.
    pub fn len(&self) -> usize {
        self.wf.len()
    }

    /// Returns `true` when the sweep holds no points.
    pub fn is_empty(&self) -> bool {
        self.wf.is_empty()
    }

    /// Home-hours ratio `HF / HM` at each sweep point.
    pub fn home_ratios(&self) -> DVector<f64> {
        self.hf.component_div(&self.hm)
    }

    /// Fits `ln(HF/HM)` on `ln(wF/wM)` across the sweep.
    pub fn regress(&self) -> Result<LogRatioRegression> {
        fit_log_ratio(&self.relative_wage, &self.hm, &self.hf)
    }
}

impl HouseholdModel {
    /// Solves the continuous problem once per female wage, holding every
    /// other parameter fixed.
    pub fn solve_wage_sweep(&self, wages: &[f64], options: &HouseholdOptions) -> Result<WageSweep> {
        if wages.is_empty() {
            return Err(ModelError::EmptyInput {
                context: "female wage vector",
            });
        }

        let solve_at = |wf: &f64| -> Result<ContinuousSolution> {
            let model = HouseholdModel::new(self.params().with_female_wage(*wf))?;
            let solution = model.solve(options)?;
            debug!("sweep point wf = {wf}: {:?}", solution.allocation);
            Ok(solution)
        };
        let solutions: Vec<ContinuousSolution> = if options.parallel_sweep {
            wages.par_iter().map(solve_at).collect::<Result<_>>()?
        } else {
            wages.iter().map(solve_at).collect::<Result<_>>()?
        };

        let n = wages.len();
        let column = |pick: fn(&ContinuousSolution) -> f64| {
            DVector::from_iterator(n, solutions.iter().map(pick))
        };
        Ok(WageSweep {
            wf: DVector::from_column_slice(wages),
            relative_wage: DVector::from_iterator(
                n,
                wages
                    .iter()
                    .map(|wf| self.params().with_female_wage(*wf).relative_wage()),
            ),
            lm: column(|s| s.allocation.lm),
            hm: column(|s| s.allocation.hm),
            lf: column(|s| s.allocation.lf),
            hf: column(|s| s.allocation.hf),
        })
    }
}
