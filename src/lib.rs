//! Household specialization and union wage-setting models.
//!
//! This crate solves two small labour-economics models that share one shape:
//! a deterministic objective over a handful of continuous choices, handed to
//! a derivative-free optimizer under box constraints, optionally re-solved
//! across a grid of exogenous inputs. It offers tools to
//!
//! - evaluate household utility over market and home hours (`household` module),
//! - solve the household problem on a grid (`discrete`) or with a bounded
//!   Nelder–Mead search (`continuous`),
//! - re-solve across female wages and regress the log home-hours ratio on the
//!   log wage ratio (`sweep`, `regression`),
//! - calibrate structural parameters to target regression coefficients
//!   (`calibration` module), and
//! - solve monopoly-union and Nash-bargaining wage setting (`union` module).
//!
//! Models are immutable values. Every solve borrows its model and returns a
//! fresh result, so sweeps and calibration never mutate shared state.
//!
//! # Quick start
//!
//! ```no_run
//! use laborecon::{
//!     CalibrationOptions, CalibrationSpec, CalibrationTargets, HouseholdModel,
//!     HouseholdOptions, HouseholdParams,
//! };
//! use laborecon::sweep::default_female_wages;
//!
//! let model = HouseholdModel::new(HouseholdParams::default()).expect("valid parameters");
//!
//! let solution = model.solve(&HouseholdOptions::default()).expect("solved");
//! println!("optimal hours: {:?}", solution.allocation);
//!
//! let sweep = model
//!     .solve_wage_sweep(&default_female_wages(), &HouseholdOptions::default())
//!     .expect("sweep");
//! println!("regression: {:?}", sweep.regress().expect("regression"));
//!
//! let result = model
//!     .calibrate(
//!         &default_female_wages(),
//!         &CalibrationTargets::default(),
//!         &CalibrationSpec::alpha_sigma(),
//!         &CalibrationOptions::default(),
//!     )
//!     .expect("calibrated");
//! println!("alpha, sigma = {:?}", result.estimates);
//! ```

pub mod calibration;
pub mod continuous;
pub mod discrete;
pub mod error;
pub mod household;
pub mod optimizer;
pub mod options;
pub mod regression;
pub mod solving;
pub mod sweep;
pub mod union;

pub use calibration::{
    CalibratedParameter, CalibrationResult, CalibrationSpec, CalibrationTargets, FreeParameter,
};
pub use continuous::ContinuousSolution;
pub use discrete::DiscreteSolution;
pub use error::{ModelError, Result};
pub use household::{HomeProduction, HouseholdModel, HouseholdParams, TimeAllocation};
pub use options::{CalibrationOptions, GridOptions, HouseholdOptions, UnionOptions};
pub use regression::LogRatioRegression;
pub use solving::{BrentOptions, NelderMeadOptions, SolveSummary};
pub use sweep::WageSweep;
pub use union::{FirmResponse, UnionModel, UnionObjective, UnionParams, UnionSolution};
