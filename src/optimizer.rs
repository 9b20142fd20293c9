//! Thin adapters that hand crate objectives to `argmin` solvers.
//!
//! Every objective is minimised. Box constraints for the simplex search are
//! enforced by clipping each candidate into the box before it is evaluated,
//! and the reported optimum is the clipped best vertex. Non-convergence is
//! logged and recorded in the [`SolveSummary`] but never turned into an
//! error: the best point found is always returned.

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentOpt;
use argmin::solver::neldermead::NelderMead;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::solving::{BrentOptions, NelderMeadOptions, SolveSummary};

/// Closed interval `[lower, upper]` for one choice variable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// Creates a closed interval, validating that it is finite and non-empty.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(ModelError::NumericalError {
                context: "bounds construction",
            });
        }
        if lower > upper {
            return Err(ModelError::invalid_parameter(
                "bounds.lower",
                lower,
                "must not exceed the upper bound",
            ));
        }
        Ok(Self { lower, upper })
    }

    /// Projects `value` into the interval.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }

    /// Returns `true` when `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Best point found by a multivariate minimisation.
#[derive(Clone, Debug)]
pub struct Minimum {
    /// Minimising point, inside the bounds.
    pub point: Vec<f64>,
    /// Objective value at `point`.
    pub value: f64,
    /// Optimizer diagnostics.
    pub summary: SolveSummary,
}

/// Best point found by a scalar minimisation.
#[derive(Clone, Debug)]
pub struct ScalarMinimum {
    /// Minimising argument.
    pub point: f64,
    /// Objective value at `point`.
    pub value: f64,
    /// Optimizer diagnostics.
    pub summary: SolveSummary,
}

struct BoxedObjective<'a, F> {
    objective: &'a F,
    bounds: &'a [Bounds],
}

impl<F> CostFunction for BoxedObjective<'_, F>
where
    F: Fn(&[f64]) -> Result<f64>,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, Error> {
        let point = clamp_point(param, self.bounds);
        Ok((self.objective)(&point)?)
    }
}

struct ScalarObjective<'a, F> {
    objective: &'a F,
}

impl<F> CostFunction for ScalarObjective<'_, F>
where
    F: Fn(f64) -> Result<f64>,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, Error> {
        Ok((self.objective)(*param)?)
    }
}

/// Minimises `objective` with a bounded Nelder–Mead simplex started at `guess`.
///
/// The guess is clipped into `bounds` and is always a vertex of the initial
/// simplex, so the returned value never exceeds the objective at the guess.
pub fn minimize_bounded<F>(
    objective: &F,
    guess: &[f64],
    bounds: &[Bounds],
    options: &NelderMeadOptions,
) -> Result<Minimum>
where
    F: Fn(&[f64]) -> Result<f64>,
{
    if guess.is_empty() {
        return Err(ModelError::EmptyInput {
            context: "initial guess",
        });
    }
    if guess.len() != bounds.len() {
        return Err(ModelError::dimension_mismatch(
            "bounds length",
            guess.len(),
            bounds.len(),
        ));
    }

    let x0 = clamp_point(guess, bounds);
    let simplex = initial_simplex(&x0, bounds, options);
    // NelderMead::init panics on a failing cost, so the starting vertices are
    // checked here and the first error is returned instead.
    for vertex in &simplex {
        objective(vertex)?;
    }
    let solver = NelderMead::new(simplex).with_sd_tolerance(options.sd_tolerance)?;
    let problem = BoxedObjective { objective, bounds };
    let max_iters = options.iteration_limit(guess.len());

    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()?;
    let state = result.state();

    let best = state.get_best_param().ok_or_else(|| ModelError::Optimizer {
        text: "Nelder-Mead returned no best point".to_string(),
    })?;
    let point = clamp_point(best, bounds);
    let summary = summarize(state);
    if !summary.converged {
        warn!(
            "Nelder-Mead stopped without converging after {} iterations ({})",
            summary.iterations, summary.termination
        );
    }
    debug!(
        "Nelder-Mead minimum {:.6e} at {:?} after {} iterations",
        state.get_best_cost(),
        point,
        summary.iterations
    );

    Ok(Minimum {
        point,
        value: state.get_best_cost(),
        summary,
    })
}

/// Minimises a scalar `objective` over `interval` with Brent's method.
pub fn minimize_scalar<F>(
    objective: &F,
    interval: Bounds,
    options: &BrentOptions,
) -> Result<ScalarMinimum>
where
    F: Fn(f64) -> Result<f64>,
{
    if interval.lower >= interval.upper {
        return Err(ModelError::invalid_parameter(
            "interval.lower",
            interval.lower,
            "must be strictly below the upper bound",
        ));
    }

    let solver = BrentOpt::new(interval.lower, interval.upper);
    let problem = ScalarObjective { objective };
    let max_iters = options.max_iterations;

    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()?;
    let state = result.state();

    let point = *state.get_best_param().ok_or_else(|| ModelError::Optimizer {
        text: "Brent returned no best point".to_string(),
    })?;
    let summary = summarize(state);
    if !summary.converged {
        warn!(
            "Brent stopped without converging after {} iterations ({})",
            summary.iterations, summary.termination
        );
    }

    Ok(ScalarMinimum {
        point: interval.clamp(point),
        value: state.get_best_cost(),
        summary,
    })
}

fn clamp_point(point: &[f64], bounds: &[Bounds]) -> Vec<f64> {
    point
        .iter()
        .zip(bounds)
        .map(|(value, bound)| bound.clamp(*value))
        .collect()
}

fn initial_simplex(
    x0: &[f64],
    bounds: &[Bounds],
    options: &NelderMeadOptions,
) -> Vec<Vec<f64>> {
    let mut vertices = Vec::with_capacity(x0.len() + 1);
    vertices.push(x0.to_vec());

    for (k, bound) in bounds.iter().enumerate() {
        let origin = x0[k];
        let stepped = if origin != 0.0 {
            origin * (1.0 + options.nonzero_step)
        } else {
            options.zero_step
        };
        let mut coordinate = bound.clamp(stepped);
        if coordinate == origin {
            // Guess sits on the bound the step points at; step the other way.
            let width = (stepped - origin).abs().max(options.zero_step);
            coordinate = bound.clamp(origin - width);
        }

        let mut vertex = x0.to_vec();
        vertex[k] = coordinate;
        vertices.push(vertex);
    }

    vertices
}

fn summarize<I: State>(state: &I) -> SolveSummary {
    let status = state.get_termination_status();
    SolveSummary {
        iterations: state.get_iter(),
        cost_evaluations: state
            .get_func_counts()
            .get("cost_count")
            .copied()
            .unwrap_or(0),
        converged: matches!(
            status,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        ),
        termination: format!("{status:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bounded_simplex_finds_interior_quadratic_minimum() {
        let objective =
            |x: &[f64]| -> Result<f64> { Ok((x[0] - 1.5).powi(2) + (x[1] + 0.5).powi(2)) };
        let bounds = [Bounds::new(0.0, 5.0).unwrap(), Bounds::new(-2.0, 2.0).unwrap()];
        let minimum =
            minimize_bounded(&objective, &[3.0, 1.0], &bounds, &NelderMeadOptions::default())
                .unwrap();

        assert_relative_eq!(minimum.point[0], 1.5, epsilon = 1e-3);
        assert_relative_eq!(minimum.point[1], -0.5, epsilon = 1e-3);
        assert!(minimum.value < 1e-6);
    }

    #[test]
    fn bounded_simplex_respects_box_when_minimum_lies_outside() {
        let objective = |x: &[f64]| -> Result<f64> { Ok((x[0] + 3.0).powi(2)) };
        let bounds = [Bounds::new(0.0, 10.0).unwrap()];
        let minimum =
            minimize_bounded(&objective, &[4.0], &bounds, &NelderMeadOptions::default()).unwrap();

        assert!(bounds[0].contains(minimum.point[0]));
        assert_relative_eq!(minimum.point[0], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn objective_errors_propagate_unchanged() {
        let objective = |_: &[f64]| -> Result<f64> {
            Err(ModelError::NumericalError {
                context: "test objective",
            })
        };
        let bounds = [Bounds::new(0.0, 1.0).unwrap()];
        let err = minimize_bounded(&objective, &[0.5], &bounds, &NelderMeadOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::NumericalError {
                context: "test objective"
            }
        ));
    }

    #[test]
    fn error_at_a_later_starting_vertex_is_returned() {
        let objective = |x: &[f64]| -> Result<f64> {
            if x[0] > 0.5 {
                Err(ModelError::invalid_parameter("x", x[0], "must not exceed 0.5"))
            } else {
                Ok(x[0])
            }
        };
        let bounds = [Bounds::new(0.0, 1.0).unwrap()];
        let err = minimize_bounded(&objective, &[0.5], &bounds, &NelderMeadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter { name: "x", .. }));
    }

    #[test]
    fn simplex_steps_inward_from_upper_bound() {
        let bounds = [Bounds::new(0.0, 1.0).unwrap(), Bounds::new(0.0, 1.0).unwrap()];
        let simplex = initial_simplex(&[1.0, 0.0], &bounds, &NelderMeadOptions::default());
        assert_eq!(simplex.len(), 3);
        assert!(simplex[1][0] < 1.0);
        assert_relative_eq!(simplex[2][1], 0.000_25);
    }

    #[test]
    fn brent_locates_scalar_minimum() {
        let objective = |x: f64| -> Result<f64> { Ok((x - 2.0).powi(2) + 1.0) };
        let minimum = minimize_scalar(
            &objective,
            Bounds::new(0.0, 10.0).unwrap(),
            &BrentOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(minimum.point, 2.0, epsilon = 1e-4);
        assert_relative_eq!(minimum.value, 1.0, epsilon = 1e-8);
    }

    #[test]
    fn mismatched_bounds_are_rejected() {
        let objective = |x: &[f64]| -> Result<f64> { Ok(x[0]) };
        let bounds = [Bounds::new(0.0, 1.0).unwrap()];
        let err = minimize_bounded(&objective, &[0.5, 0.5], &bounds, &NelderMeadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
    }
}
