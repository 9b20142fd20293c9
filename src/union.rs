//! Monopoly-union wage setting with a constant-elasticity downstream firm.
//!
//! The union picks the wage `W`. Taking `W` as given, the firm prices at a
//! constant markup `P = sigma / (sigma - 1) * W`, sells `Y = min(P^-sigma, 1)`
//! and hires one unit of labour per unit of output, so employment is capped
//! at full employment. The union either maximises its own utility or the
//! generalized Nash product of its utility and the firm's profit.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{check_parameter, Result};
use crate::optimizer::{minimize_scalar, Bounds};
use crate::options::UnionOptions;
use crate::solving::SolveSummary;

/// Parameters of the union wage-setting model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnionParams {
    /// Weight of employment in union utility.
    pub eta: f64,
    /// Price elasticity of product demand; must exceed one.
    pub sigma: f64,
    /// Reservation wage.
    pub b: f64,
    /// Union bargaining weight in the Nash product.
    pub bargaining_weight: f64,
}

impl Default for UnionParams {
    fn default() -> Self {
        Self {
            eta: 1.0,
            sigma: 2.0,
            b: 0.5,
            bargaining_weight: 0.5,
        }
    }
}

impl UnionParams {
    /// Validates every parameter against its admissible range.
    pub fn validate(&self) -> Result<()> {
        check_parameter("eta", self.eta, self.eta > 0.0, "must be positive")?;
        check_parameter("sigma", self.sigma, self.sigma > 1.0, "must exceed one")?;
        check_parameter("b", self.b, self.b >= 0.0, "must be non-negative")?;
        check_parameter(
            "bargaining_weight",
            self.bargaining_weight,
            self.bargaining_weight > 0.0 && self.bargaining_weight <= 1.0,
            "must lie in (0, 1]",
        )?;
        Ok(())
    }

    /// Markup of price over the wage, `sigma / (sigma - 1)`.
    pub fn markup(&self) -> f64 {
        self.sigma / (self.sigma - 1.0)
    }
}

/// What the union maximises when choosing the wage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionObjective {
    /// Union utility alone.
    Monopoly,
    /// Nash product of union utility and firm profit.
    Nash,
}

/// The firm's best response to a wage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirmResponse {
    /// Markup price `sigma / (sigma - 1) * W`.
    pub price: f64,
    /// Units sold, capped at one.
    pub output: f64,
    /// Employment, one unit per unit of output.
    pub labor: f64,
    /// Revenue less the wage bill.
    pub profit: f64,
}

/// Wage chosen by [`UnionModel::solve`] and the allocation it implies.
#[derive(Clone, Debug)]
pub struct UnionSolution {
    /// Objective that was maximised.
    pub objective: UnionObjective,
    /// Chosen wage.
    pub wage: f64,
    /// Labour demanded by the firm at `wage`.
    pub labor: f64,
    /// Firm price at `wage`.
    pub price: f64,
    /// Firm output at `wage`.
    pub output: f64,
    /// Firm profit at `wage`.
    pub profit: f64,
    /// Maximised objective value.
    pub value: f64,
    /// Optimizer diagnostics.
    pub summary: SolveSummary,
}

/// A validated union wage-setting model.
#[derive(Clone, Debug)]
pub struct UnionModel {
    params: UnionParams,
}

impl UnionModel {
    pub fn new(params: UnionParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &UnionParams {
        &self.params
    }

    /// Price, output, employment and profit of the firm facing `wage`.
    pub fn firm_response(&self, wage: f64) -> FirmResponse {
        let price = self.params.markup() * wage;
        let output = price.powf(-self.params.sigma).min(1.0);
        let labor = output;
        FirmResponse {
            price,
            output,
            labor,
            profit: price * output - wage * labor,
        }
    }

    /// Union utility `(W - b) * L^eta`.
    pub fn union_utility(&self, wage: f64) -> f64 {
        let labor = self.firm_response(wage).labor;
        (wage - self.params.b) * labor.powf(self.params.eta)
    }

    /// Generalized Nash product `U^lambda * profit^(1 - lambda)`.
    ///
    /// Below the reservation wage the union surplus is returned unchanged, so
    /// the objective is continuous in the wage.
    pub fn nash_product(&self, wage: f64) -> f64 {
        let utility = self.union_utility(wage);
        if utility <= 0.0 {
            return utility;
        }
        let weight = self.params.bargaining_weight;
        let profit = self.firm_response(wage).profit.max(0.0);
        utility.powf(weight) * profit.powf(1.0 - weight)
    }

    /// Value of `objective` at `wage`.
    pub fn objective_value(&self, objective: UnionObjective, wage: f64) -> f64 {
        match objective {
            UnionObjective::Monopoly => self.union_utility(wage),
            UnionObjective::Nash => self.nash_product(wage),
        }
    }

    /// Maximises `objective` over the configured strictly positive wage interval.
    pub fn solve(
        &self,
        objective: UnionObjective,
        options: &UnionOptions,
    ) -> Result<UnionSolution> {
        let (lower, upper) = options.wage_interval;
        check_parameter(
            "wage_interval.lower",
            lower,
            lower > 0.0,
            "must be strictly positive",
        )?;
        let interval = Bounds::new(lower, upper)?;

        let negated = |wage: f64| -> Result<f64> { Ok(-self.objective_value(objective, wage)) };
        let minimum = minimize_scalar(&negated, interval, &options.brent)?;
        let wage = minimum.point;
        let firm = self.firm_response(wage);
        let value = self.objective_value(objective, wage);

        info!(
            "{objective:?} wage {:.6}: labor {:.6}, price {:.6}, value {:.6}",
            wage, firm.labor, firm.price, value
        );

        Ok(UnionSolution {
            objective,
            wage,
            labor: firm.labor,
            price: firm.price,
            output: firm.output,
            profit: firm.profit,
            value,
            summary: minimum.summary,
        })
    }

    /// Re-solves the model once per reservation wage in `reservation_wages`.
    pub fn solve_over_reservation_wages(
        &self,
        reservation_wages: &[f64],
        objective: UnionObjective,
        options: &UnionOptions,
    ) -> Result<Vec<UnionSolution>> {
        reservation_wages
            .iter()
            .map(|b| -> Result<UnionSolution> {
                let model = UnionModel::new(UnionParams {
                    b: *b,
                    ..self.params.clone()
                })?;
                let solution = model.solve(objective, options)?;
                debug!("b = {b}: wage {:.6}, labor {:.6}", solution.wage, solution.labor);
                Ok(solution)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> UnionModel {
        UnionModel::new(UnionParams::default()).unwrap()
    }

    #[test]
    fn output_is_capped_at_full_employment() {
        let firm = model().firm_response(0.3);
        assert_relative_eq!(firm.price, 0.6, epsilon = 1e-12);
        assert_eq!(firm.output, 1.0);
        assert_eq!(firm.labor, 1.0);

        let firm = model().firm_response(1.0);
        assert_relative_eq!(firm.output, 0.25, epsilon = 1e-12);
        assert_relative_eq!(firm.profit, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn monopoly_wage_matches_closed_form() {
        // Interior optimum W = sigma * eta * b / (sigma * eta - 1).
        let solution = model()
            .solve(UnionObjective::Monopoly, &UnionOptions::default())
            .unwrap();
        assert_relative_eq!(solution.wage, 1.0, epsilon = 1e-3);
        assert_relative_eq!(solution.labor, 0.25, epsilon = 1e-3);
        assert_relative_eq!(solution.value, 0.125, epsilon = 1e-6);
    }

    #[test]
    fn symmetric_nash_bargain_lowers_the_wage() {
        let solution = model()
            .solve(UnionObjective::Nash, &UnionOptions::default())
            .unwrap();
        assert_relative_eq!(solution.wage, 0.75, epsilon = 1e-3);
        assert_relative_eq!(solution.labor, 1.0 / 2.25, epsilon = 1e-3);
    }

    #[test]
    fn full_bargaining_weight_reproduces_monopoly() {
        let params = UnionParams {
            bargaining_weight: 1.0,
            ..UnionParams::default()
        };
        let model = UnionModel::new(params).unwrap();
        for wage in [0.2, 0.7, 1.0, 3.0] {
            assert_relative_eq!(
                model.nash_product(wage),
                model.union_utility(wage),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn nash_product_is_union_surplus_below_reservation_wage() {
        let model = model();
        assert_eq!(model.nash_product(0.2), model.union_utility(0.2));
        assert!(model.nash_product(0.2) < 0.0);
    }

    #[test]
    fn reservation_wage_sweep_raises_wages() {
        let solutions = model()
            .solve_over_reservation_wages(
                &[0.5, 1.0],
                UnionObjective::Monopoly,
                &UnionOptions::default(),
            )
            .unwrap();
        assert_eq!(solutions.len(), 2);
        assert_relative_eq!(solutions[0].wage, 1.0, epsilon = 1e-3);
        assert_relative_eq!(solutions[1].wage, 2.0, epsilon = 2e-3);
    }

    #[test]
    fn inelastic_demand_is_rejected() {
        let params = UnionParams {
            sigma: 1.0,
            ..UnionParams::default()
        };
        assert!(UnionModel::new(params).is_err());
    }
}
