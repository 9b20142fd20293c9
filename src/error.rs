use thiserror::Error;

/// Unified error type for `laborecon` operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Raised when a structural parameter lies outside its admissible range.
    #[error("parameter `{name}` = {value} is invalid: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The value that was supplied.
        value: f64,
        /// Short description of the admissible range.
        reason: &'static str,
    },

    /// Raised when provided vectors or matrices have incompatible dimensions.
    #[error("dimension mismatch in {context}: expected {expected} but found {found}")]
    DimensionMismatch {
        /// Human-readable context describing the operation.
        context: &'static str,
        /// The required dimension.
        expected: usize,
        /// The dimension that was actually supplied.
        found: usize,
    },

    /// Raised when an operation needs at least one input value.
    #[error("{context} must not be empty")]
    EmptyInput { context: &'static str },

    /// Raised when linear algebra operations encounter a singular system.
    #[error("matrix in {context} is singular")]
    SingularMatrix { context: &'static str },

    /// Raised when numerical routines produce NaN or infinities where a finite value is required.
    #[error("encountered non-finite value during {context}")]
    NumericalError { context: &'static str },

    /// Raised when the underlying optimizer fails for reasons other than the objective.
    #[error("optimizer failed: {text}")]
    Optimizer { text: String },
}

impl ModelError {
    /// Helper to format an [`InvalidParameter`](ModelError::InvalidParameter) error.
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Helper to format a [`DimensionMismatch`](ModelError::DimensionMismatch) error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Helper to raise when a matrix factorization fails due to singularity.
    pub fn singular(context: &'static str) -> Self {
        Self::SingularMatrix { context }
    }
}

impl From<argmin::core::Error> for ModelError {
    fn from(err: argmin::core::Error) -> Self {
        // Objective closures report crate errors through argmin; recover them intact.
        match err.downcast::<ModelError>() {
            Ok(model_err) => model_err,
            Err(other) => Self::Optimizer {
                text: other.to_string(),
            },
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Checks that `value` is finite and satisfies `admissible`.
pub(crate) fn check_parameter(
    name: &'static str,
    value: f64,
    admissible: bool,
    reason: &'static str,
) -> Result<()> {
    if !value.is_finite() {
        return Err(ModelError::invalid_parameter(name, value, "must be finite"));
    }
    if !admissible {
        return Err(ModelError::invalid_parameter(name, value, reason));
    }
    Ok(())
}
