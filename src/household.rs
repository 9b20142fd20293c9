//! Household specialization model: parameters, home production and utility.
//!
//! Two household members (`M` and `F`) split a time endowment between market
//! work (`L`) and home production (`H`). Market work buys consumption at the
//! member's wage, home hours feed a CES home-production index, and both are
//! combined in a Cobb–Douglas consumption bundle evaluated under CRRA utility,
//! net of a separable disutility of total working time.

use serde::{Deserialize, Serialize};

use crate::error::{check_parameter, Result};

/// Additive guard applied to home hours before raising them to a power.
pub const HOME_EPSILON: f64 = 1e-10;

/// Lower bound on the consumption bundle before the CRRA transform.
pub const UTILITY_FLOOR: f64 = 1e-8;

/// Distance from 0 or 1 within which `sigma` (or `rho`) selects the limiting regime.
pub const REGIME_TOLERANCE: f64 = 1e-8;

/// Structural parameters of the household model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdParams {
    /// Relative risk aversion of the consumption bundle.
    pub rho: f64,
    /// Weight on the disutility of work.
    pub nu: f64,
    /// Frisch elasticity of labour supply.
    pub epsilon: f64,
    /// Share of market consumption in the consumption bundle.
    pub omega: f64,
    /// Fraction of the female member's home hours that carry no disutility.
    pub theta: f64,
    /// Productivity share of the female member in home production.
    pub alpha: f64,
    /// Elasticity of substitution between the members' home hours.
    pub sigma: f64,
    /// Male wage.
    pub wm: f64,
    /// Female wage.
    pub wf: f64,
    /// Time endowment of each member.
    pub total_time: f64,
}

impl Default for HouseholdParams {
    fn default() -> Self {
        Self {
            rho: 2.0,
            nu: 0.001,
            epsilon: 1.0,
            omega: 0.5,
            theta: 0.0,
            alpha: 0.5,
            sigma: 1.0,
            wm: 1.0,
            wf: 1.0,
            total_time: 24.0,
        }
    }
}

impl HouseholdParams {
    /// Validates every parameter against its admissible range.
    pub fn validate(&self) -> Result<()> {
        check_parameter("rho", self.rho, self.rho > 0.0, "must be positive")?;
        check_parameter("nu", self.nu, self.nu >= 0.0, "must be non-negative")?;
        check_parameter("epsilon", self.epsilon, self.epsilon > 0.0, "must be positive")?;
        check_parameter(
            "omega",
            self.omega,
            (0.0..=1.0).contains(&self.omega),
            "must lie in [0, 1]",
        )?;
        check_parameter("theta", self.theta, true, "")?;
        check_parameter(
            "alpha",
            self.alpha,
            (0.0..=1.0).contains(&self.alpha),
            "must lie in [0, 1]",
        )?;
        check_parameter("sigma", self.sigma, self.sigma >= 0.0, "must be non-negative")?;
        check_parameter("wm", self.wm, self.wm > 0.0, "must be positive")?;
        check_parameter("wf", self.wf, self.wf > 0.0, "must be positive")?;
        check_parameter(
            "total_time",
            self.total_time,
            self.total_time > 0.0,
            "must be positive",
        )?;
        Ok(())
    }

    /// Returns a copy with the female wage replaced.
    pub fn with_female_wage(&self, wf: f64) -> Self {
        Self { wf, ..self.clone() }
    }

    /// Female-to-male wage ratio.
    pub fn relative_wage(&self) -> f64 {
        self.wf / self.wm
    }
}

/// Home-production aggregator, selected once from `(alpha, sigma)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HomeProduction {
    /// Perfect complements: `min(HM, HF)`.
    Leontief,
    /// Unit elasticity: `HM^(1-alpha) * HF^alpha`.
    CobbDouglas { alpha: f64 },
    /// General CES with `exponent = (sigma - 1) / sigma`.
    Ces { alpha: f64, exponent: f64 },
}

impl HomeProduction {
    /// Picks the regime implied by the share `alpha` and elasticity `sigma`.
    pub fn new(alpha: f64, sigma: f64) -> Self {
        if sigma.abs() < REGIME_TOLERANCE {
            Self::Leontief
        } else if (sigma - 1.0).abs() < REGIME_TOLERANCE {
            Self::CobbDouglas { alpha }
        } else {
            Self::Ces {
                alpha,
                exponent: (sigma - 1.0) / sigma,
            }
        }
    }

    /// Evaluates the home-production index.
    pub fn index(&self, hm: f64, hf: f64) -> f64 {
        match *self {
            Self::Leontief => hm.min(hf),
            Self::CobbDouglas { alpha } => {
                (hm + HOME_EPSILON).powf(1.0 - alpha) * (hf + HOME_EPSILON).powf(alpha)
            }
            Self::Ces { alpha, exponent } => {
                let inner = (1.0 - alpha) * (hm + HOME_EPSILON).powf(exponent)
                    + alpha * (hf + HOME_EPSILON).powf(exponent);
                inner.powf(1.0 / exponent)
            }
        }
    }
}

/// Market and home hours of both household members.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeAllocation {
    /// Male market hours.
    pub lm: f64,
    /// Male home hours.
    pub hm: f64,
    /// Female market hours.
    pub lf: f64,
    /// Female home hours.
    pub hf: f64,
}

impl TimeAllocation {
    /// Builds an allocation from its four components.
    pub fn new(lm: f64, hm: f64, lf: f64, hf: f64) -> Self {
        Self { lm, hm, lf, hf }
    }

    /// Builds an allocation from `[lm, hm, lf, hf]`.
    pub fn from_slice(values: &[f64]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Components in the order `[lm, hm, lf, hf]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.lm, self.hm, self.lf, self.hf]
    }

    /// Total hours worked by the male member.
    pub fn male_hours(&self) -> f64 {
        self.lm + self.hm
    }

    /// Total hours worked by the female member.
    pub fn female_hours(&self) -> f64 {
        self.lf + self.hf
    }

    /// Non-negative and within the per-member time endowment.
    pub fn is_feasible(&self, total_time: f64) -> bool {
        self.to_array().iter().all(|hours| *hours >= 0.0)
            && self.male_hours() <= total_time
            && self.female_hours() <= total_time
    }
}

/// A validated household model ready to be evaluated and solved.
#[derive(Clone, Debug)]
pub struct HouseholdModel {
    params: HouseholdParams,
    production: HomeProduction,
}

impl HouseholdModel {
    /// Validates `params` and fixes the home-production regime.
    pub fn new(params: HouseholdParams) -> Result<Self> {
        params.validate()?;
        let production = HomeProduction::new(params.alpha, params.sigma);
        Ok(Self { params, production })
    }

    /// Accessor for the parameter set.
    pub fn params(&self) -> &HouseholdParams {
        &self.params
    }

    /// Home-production regime selected for this parameter set.
    pub fn home_production(&self) -> HomeProduction {
        self.production
    }

    /// Utility of an allocation. Feasibility is not checked here.
    pub fn utility(&self, allocation: &TimeAllocation) -> f64 {
        let par = &self.params;

        let consumption = par.wm * allocation.lm + par.wf * allocation.lf;
        let home = self.production.index(allocation.hm, allocation.hf);
        let bundle = consumption.powf(par.omega) * home.powf(1.0 - par.omega);
        let bundle = bundle.max(UTILITY_FLOOR);
        let consumption_utility = if (par.rho - 1.0).abs() < REGIME_TOLERANCE {
            bundle.ln()
        } else {
            bundle.powf(1.0 - par.rho) / (1.0 - par.rho)
        };

        consumption_utility - self.disutility(allocation)
    }

    /// Evaluates [`utility`](Self::utility) for every allocation in `allocations`.
    pub fn utilities(&self, allocations: &[TimeAllocation]) -> Vec<f64> {
        allocations
            .iter()
            .map(|allocation| self.utility(allocation))
            .collect()
    }

    /// Disutility of total working time.
    pub fn disutility(&self, allocation: &TimeAllocation) -> f64 {
        let par = &self.params;
        let power = 1.0 + 1.0 / par.epsilon;
        let male = allocation.male_hours();
        let female = allocation.female_hours() - par.theta * allocation.hf;
        par.nu * (male.powf(power) / power + female.powf(power) / power)
    }
}
