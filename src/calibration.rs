//! Moment-matching calibration of the household model.
//!
//! Structural parameters are chosen so that the log home-hours ratio
//! regression implied by a wage sweep reproduces target coefficients. Each
//! objective evaluation builds a fresh parameter set from the candidate
//! vector; the model being calibrated is never mutated.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{check_parameter, ModelError, Result};
use crate::household::{HouseholdModel, HouseholdParams};
use crate::optimizer::{minimize_bounded, Bounds};
use crate::options::CalibrationOptions;
use crate::regression::LogRatioRegression;
use crate::solving::SolveSummary;

/// Empirical regression coefficients the model should reproduce.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationTargets {
    pub beta0: f64,
    pub beta1: f64,
}

impl Default for CalibrationTargets {
    fn default() -> Self {
        Self {
            beta0: 0.4,
            beta1: -0.1,
        }
    }
}

impl CalibrationTargets {
    /// Targets equal to an already fitted regression.
    pub fn from_regression(fit: &LogRatioRegression) -> Self {
        Self {
            beta0: fit.beta0,
            beta1: fit.beta1,
        }
    }

    /// Sum of squared deviations of `fit` from the targets.
    pub fn loss(&self, fit: &LogRatioRegression) -> f64 {
        (self.beta0 - fit.beta0).powi(2) + (self.beta1 - fit.beta1).powi(2)
    }
}

/// Household parameters that can be freed during calibration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibratedParameter {
    /// Female productivity share in home production.
    Alpha,
    /// Elasticity of substitution in home production.
    Sigma,
    /// Female home-hours disutility asymmetry.
    Theta,
}

impl CalibratedParameter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Sigma => "sigma",
            Self::Theta => "theta",
        }
    }

    /// Current value of the parameter in `params`.
    pub fn value(&self, params: &HouseholdParams) -> f64 {
        match self {
            Self::Alpha => params.alpha,
            Self::Sigma => params.sigma,
            Self::Theta => params.theta,
        }
    }

    fn set(&self, params: &mut HouseholdParams, value: f64) {
        match self {
            Self::Alpha => params.alpha = value,
            Self::Sigma => params.sigma = value,
            Self::Theta => params.theta = value,
        }
    }
}

/// One freed parameter with its starting value and search box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreeParameter {
    pub parameter: CalibratedParameter,
    pub guess: f64,
    pub bounds: Bounds,
}

/// Which parameters to search over, and where to start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSpec {
    pub parameters: Vec<FreeParameter>,
}

impl CalibrationSpec {
    /// Builds a spec, rejecting empty or duplicated parameter lists and
    /// guesses outside their search box.
    pub fn new(parameters: Vec<FreeParameter>) -> Result<Self> {
        if parameters.is_empty() {
            return Err(ModelError::EmptyInput {
                context: "calibrated parameter list",
            });
        }
        for (index, free) in parameters.iter().enumerate() {
            let bounds = Bounds::new(free.bounds.lower, free.bounds.upper)?;
            check_parameter(
                free.parameter.name(),
                free.guess,
                bounds.contains(free.guess),
                "initial guess must lie inside its bounds",
            )?;
            if parameters[..index]
                .iter()
                .any(|other| other.parameter == free.parameter)
            {
                return Err(ModelError::invalid_parameter(
                    free.parameter.name(),
                    free.guess,
                    "listed more than once",
                ));
            }
        }
        Ok(Self { parameters })
    }

    /// Frees `alpha` in `[0, 1]` and `sigma` in `[0, 10]`, both starting at 0.5.
    pub fn alpha_sigma() -> Self {
        Self {
            parameters: vec![
                FreeParameter {
                    parameter: CalibratedParameter::Alpha,
                    guess: 0.5,
                    bounds: Bounds {
                        lower: 0.0,
                        upper: 1.0,
                    },
                },
                FreeParameter {
                    parameter: CalibratedParameter::Sigma,
                    guess: 0.5,
                    bounds: Bounds {
                        lower: 0.0,
                        upper: 10.0,
                    },
                },
            ],
        }
    }

    /// Frees `sigma` in `[0, 10]` starting at 0.1; `alpha` stays at its base value.
    pub fn sigma_only() -> Self {
        Self {
            parameters: vec![FreeParameter {
                parameter: CalibratedParameter::Sigma,
                guess: 0.1,
                bounds: Bounds {
                    lower: 0.0,
                    upper: 10.0,
                },
            }],
        }
    }

    /// Frees `theta` and `sigma`, both in `[0, 10]` starting at 1.5.
    pub fn theta_sigma() -> Self {
        Self {
            parameters: vec![
                FreeParameter {
                    parameter: CalibratedParameter::Theta,
                    guess: 1.5,
                    bounds: Bounds {
                        lower: 0.0,
                        upper: 10.0,
                    },
                },
                FreeParameter {
                    parameter: CalibratedParameter::Sigma,
                    guess: 1.5,
                    bounds: Bounds {
                        lower: 0.0,
                        upper: 10.0,
                    },
                },
            ],
        }
    }

    /// Copy of `base` with the freed parameters set to `values`.
    pub fn apply(&self, base: &HouseholdParams, values: &[f64]) -> HouseholdParams {
        let mut params = base.clone();
        for (free, value) in self.parameters.iter().zip(values) {
            free.parameter.set(&mut params, *value);
        }
        params
    }

    fn guess(&self) -> Vec<f64> {
        self.parameters.iter().map(|free| free.guess).collect()
    }

    fn bounds(&self) -> Vec<Bounds> {
        self.parameters.iter().map(|free| free.bounds).collect()
    }
}

/// Outcome of [`HouseholdModel::calibrate`].
#[derive(Clone, Debug)]
pub struct CalibrationResult {
    /// Base parameters with the calibrated values substituted.
    pub params: HouseholdParams,
    /// Calibrated values, in the order of the spec.
    pub estimates: Vec<f64>,
    /// Regression implied by `params`.
    pub regression: LogRatioRegression,
    /// Squared distance of `regression` from the targets.
    pub loss: f64,
    /// Diagnostics of the outer search.
    pub summary: SolveSummary,
}

impl HouseholdModel {
    /// Searches the parameters freed by `spec` so that the wage-sweep
    /// regression over `wages` matches `targets`.
    pub fn calibrate(
        &self,
        wages: &[f64],
        targets: &CalibrationTargets,
        spec: &CalibrationSpec,
        options: &CalibrationOptions,
    ) -> Result<CalibrationResult> {
        let base = self.params();
        let implied_regression = |values: &[f64]| -> Result<LogRatioRegression> {
            let model = HouseholdModel::new(spec.apply(base, values))?;
            model.solve_wage_sweep(wages, &options.household)?.regress()
        };
        let objective = |values: &[f64]| -> Result<f64> {
            let fit = implied_regression(values)?;
            let loss = targets.loss(&fit);
            debug!(
                "calibration candidate {:?}: beta0 = {:.6}, beta1 = {:.6}, loss = {:.3e}",
                values, fit.beta0, fit.beta1, loss
            );
            Ok(loss)
        };

        let minimum =
            minimize_bounded(&objective, &spec.guess(), &spec.bounds(), &options.simplex)?;
        let regression = implied_regression(&minimum.point)?;
        let loss = targets.loss(&regression);

        info!(
            "calibrated {} after {} iterations: estimates {:?}, loss {:.3e}",
            spec.parameters
                .iter()
                .map(|free| free.parameter.name())
                .collect::<Vec<_>>()
                .join(", "),
            minimum.summary.iterations,
            minimum.point,
            loss
        );

        Ok(CalibrationResult {
            params: spec.apply(base, &minimum.point),
            estimates: minimum.point,
            regression,
            loss,
            summary: minimum.summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solving::NelderMeadOptions;
    use crate::sweep::default_female_wages;
    use approx::assert_relative_eq;

    #[test]
    fn presets_free_the_expected_parameters() {
        let alpha_sigma = CalibrationSpec::alpha_sigma();
        assert_eq!(alpha_sigma.guess(), vec![0.5, 0.5]);
        assert_eq!(alpha_sigma.bounds()[0].upper, 1.0);

        let sigma_only = CalibrationSpec::sigma_only();
        assert_eq!(sigma_only.parameters.len(), 1);
        assert_eq!(sigma_only.guess(), vec![0.1]);

        let theta_sigma = CalibrationSpec::theta_sigma();
        assert_eq!(theta_sigma.parameters[0].parameter, CalibratedParameter::Theta);
    }

    #[test]
    fn apply_leaves_base_untouched() {
        let base = HouseholdParams::default();
        let spec = CalibrationSpec::theta_sigma();
        let candidate = spec.apply(&base, &[0.7, 2.5]);

        assert_eq!(candidate.theta, 0.7);
        assert_eq!(candidate.sigma, 2.5);
        assert_eq!(base.theta, 0.0);
        assert_eq!(base.sigma, 1.0);
    }

    #[test]
    fn duplicated_parameters_are_rejected() {
        let free = CalibrationSpec::sigma_only().parameters[0];
        assert!(CalibrationSpec::new(vec![free, free]).is_err());
        assert!(CalibrationSpec::new(Vec::new()).is_err());
    }

    #[test]
    fn guesses_outside_their_bounds_are_rejected() {
        let mut free = CalibrationSpec::sigma_only().parameters[0];
        free.guess = 12.0;
        assert!(CalibrationSpec::new(vec![free]).is_err());

        free.guess = 1.0;
        free.bounds = Bounds {
            lower: 5.0,
            upper: 1.0,
        };
        assert!(CalibrationSpec::new(vec![free]).is_err());
    }

    #[test]
    fn inadmissible_candidate_returns_an_error() {
        let model = HouseholdModel::new(HouseholdParams::default()).unwrap();
        let spec = CalibrationSpec::new(vec![FreeParameter {
            parameter: CalibratedParameter::Alpha,
            guess: 1.5,
            bounds: Bounds::new(0.0, 2.0).unwrap(),
        }])
        .unwrap();

        let err = model
            .calibrate(
                &default_female_wages(),
                &CalibrationTargets::default(),
                &spec,
                &CalibrationOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidParameter { name: "alpha", .. }
        ));
    }

    #[test]
    fn theta_sigma_calibration_stays_in_its_box() {
        let model = HouseholdModel::new(HouseholdParams::default()).unwrap();
        let spec = CalibrationSpec::theta_sigma();
        let options = CalibrationOptions::default()
            .with_simplex(NelderMeadOptions::default().with_max_iterations(5));

        let result = model
            .calibrate(
                &default_female_wages(),
                &CalibrationTargets::default(),
                &spec,
                &options,
            )
            .unwrap();
        assert!(result.loss.is_finite());
        assert_eq!(result.estimates.len(), 2);
        for (estimate, free) in result.estimates.iter().zip(&spec.parameters) {
            assert!(free.bounds.contains(*estimate));
        }
        assert_eq!(result.params.theta, result.estimates[0]);
        assert_eq!(result.params.sigma, result.estimates[1]);
        assert!(result.summary.iterations <= 5);
    }

    #[test]
    fn loss_is_zero_at_target() {
        let targets = CalibrationTargets::default();
        let fit = LogRatioRegression {
            beta0: 0.4,
            beta1: -0.1,
        };
        assert_eq!(targets.loss(&fit), 0.0);
        assert_relative_eq!(
            targets.loss(&LogRatioRegression {
                beta0: 0.5,
                beta1: -0.3
            }),
            0.05,
            epsilon = 1e-12
        );
    }

    #[test]
    fn self_generated_targets_keep_sigma_at_its_start() {
        let base = HouseholdParams {
            sigma: 0.1,
            ..HouseholdParams::default()
        };
        let model = HouseholdModel::new(base).unwrap();
        let wages = default_female_wages();
        let options = CalibrationOptions::default()
            .with_simplex(NelderMeadOptions::default().with_max_iterations(15));
        let targets = CalibrationTargets::from_regression(
            &model
                .solve_wage_sweep(&wages, &options.household)
                .unwrap()
                .regress()
                .unwrap(),
        );

        let result = model
            .calibrate(&wages, &targets, &CalibrationSpec::sigma_only(), &options)
            .unwrap();
        assert!(result.loss < 1e-8);
        assert_relative_eq!(result.estimates[0], 0.1, epsilon = 0.02);
        assert_eq!(
            CalibratedParameter::Sigma.value(&result.params),
            result.estimates[0]
        );
    }
}
