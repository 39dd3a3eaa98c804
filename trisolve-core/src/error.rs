//! Crate-level error types for trisolve-core.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("node count must be >= 2, got {0}")]
    TooFewNodes(usize),

    #[error("domain length must be positive and finite, got {0}")]
    NonPositiveLength(f64),

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("wave scheme unstable: (tau/h)^2 = {courant_squared} exceeds 1")]
    Unstable { courant_squared: f64 },

    #[error("bootstrap safety factor must lie in (0, 1], got {0}")]
    InvalidSafety(f64),

    #[error("diffusion bootstrap needs {required} sub-steps, more than the limit of {max}")]
    TooManySubsteps { required: f64, max: usize },

    #[error("invalid initial profile: {0}")]
    InvalidProfile(String),

    #[error("degenerate arithmetic in {context}: {value}")]
    DegenerateArithmetic { context: &'static str, value: f64 },

    #[error("engine has not been initialized")]
    NotInitialized,
}

impl SolverError {
    /// True for every variant raised while validating configuration.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            SolverError::DegenerateArithmetic { .. } | SolverError::NotInitialized
        )
    }
}
