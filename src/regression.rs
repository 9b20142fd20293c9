//! Ordinary least squares for the log home-hours ratio regression.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::household::HOME_EPSILON;

/// Coefficients of `ln(HF/HM) = beta0 + beta1 * ln(wF/wM)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRatioRegression {
    /// Intercept.
    pub beta0: f64,
    /// Elasticity of the home-hours ratio with respect to the wage ratio.
    pub beta1: f64,
}

/// Solves the normal equations `X'X b = X'y` for the OLS coefficients.
pub fn ols(design: &DMatrix<f64>, response: &DVector<f64>) -> Result<DVector<f64>> {
    if design.nrows() != response.len() {
        return Err(ModelError::dimension_mismatch(
            "regression response length",
            design.nrows(),
            response.len(),
        ));
    }
    if design.nrows() < design.ncols() {
        return Err(ModelError::dimension_mismatch(
            "regression observations",
            design.ncols(),
            design.nrows(),
        ));
    }

    let x_t = design.transpose();
    let xtx = &x_t * design;
    let rhs = x_t * response;
    let cholesky =
        nalgebra::linalg::Cholesky::new(xtx).ok_or_else(|| ModelError::singular("X'X"))?;
    Ok(cholesky.solve(&rhs))
}

/// Regresses `ln((hf+ε)/(hm+ε))` on an intercept and `ln(relative_wage)`.
pub fn fit_log_ratio(
    relative_wages: &DVector<f64>,
    hm: &DVector<f64>,
    hf: &DVector<f64>,
) -> Result<LogRatioRegression> {
    let n = relative_wages.len();
    if hm.len() != n {
        return Err(ModelError::dimension_mismatch("HM length", n, hm.len()));
    }
    if hf.len() != n {
        return Err(ModelError::dimension_mismatch("HF length", n, hf.len()));
    }

    let mut design = DMatrix::from_element(n, 2, 1.0);
    for (row, wage) in relative_wages.iter().enumerate() {
        design[(row, 1)] = wage.ln();
    }
    let response = DVector::from_iterator(
        n,
        hf.iter()
            .zip(hm.iter())
            .map(|(f, m)| ((f + HOME_EPSILON) / (m + HOME_EPSILON)).ln()),
    );
    if design.iter().chain(response.iter()).any(|v| !v.is_finite()) {
        return Err(ModelError::NumericalError {
            context: "log-ratio regression inputs",
        });
    }

    let beta = ols(&design, &response)?;
    Ok(LogRatioRegression {
        beta0: beta[0],
        beta1: beta[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_linear_relationship() {
        let wages: DVector<f64> = DVector::from_vec(vec![0.8, 0.9, 1.0, 1.1, 1.2]);
        // HF/HM = exp(0.4) * w^(-0.1)
        let hm = DVector::from_element(5, 5.0);
        let hf = wages.map(|w: f64| 5.0 * (0.4 - 0.1 * w.ln()).exp());

        let fit = fit_log_ratio(&wages, &hm, &hf).unwrap();
        assert_relative_eq!(fit.beta0, 0.4, epsilon = 1e-8);
        assert_relative_eq!(fit.beta1, -0.1, epsilon = 1e-8);
    }

    #[test]
    fn constant_regressor_is_singular() {
        let wages = DVector::from_element(3, 1.0);
        let hours = DVector::from_element(3, 4.0);
        let err = fit_log_ratio(&wages, &hours, &hours).unwrap_err();
        assert!(matches!(err, ModelError::SingularMatrix { .. }));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let wages = DVector::from_vec(vec![0.9, 1.1]);
        let hm = DVector::from_element(3, 4.0);
        let hf = DVector::from_element(2, 4.0);
        let err = fit_log_ratio(&wages, &hm, &hf).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
    }

    #[test]
    fn ols_matches_closed_form_slope() {
        let design = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let response = DVector::from_vec(vec![1.0, 3.0, 5.0]);
        let beta = ols(&design, &response).unwrap();
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-10);
    }
}
