use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::scheme::EquationKind;

/// Arbitrary initial condition `u(x, 0)`.
#[derive(Clone)]
pub struct ProfileFn(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl ProfileFn {
    pub fn new<F>(f: F) -> ProfileFn
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        ProfileFn(Arc::new(f))
    }
}

impl fmt::Debug for ProfileFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProfileFn(..)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    pub center: f64,
    pub width: f64,
    pub amplitude: f64,
}

/// Initial field profile, evaluated at node positions.
///
/// Positions are measured from the left end of the domain. `Sine` uses the
/// domain length so that mode `m` fits `m` half-waves between the ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialProfile {
    Sine { mode: u32, amplitude: f64 },
    /// `value` on the open interval `(start, end)`, zero elsewhere.
    Bump { start: f64, end: f64, value: f64 },
    Gaussians { blobs: Vec<Gaussian> },
    #[serde(skip)]
    Custom(ProfileFn),
}

impl InitialProfile {
    /// `sin(pi x)` for waves, the unit bump on `(0.4, 0.6)` for diffusion.
    pub fn reference(kind: EquationKind) -> InitialProfile {
        match kind {
            EquationKind::Wave => InitialProfile::Sine {
                mode: 1,
                amplitude: 1.0,
            },
            EquationKind::Diffusion => InitialProfile::Bump {
                start: 0.4,
                end: 0.6,
                value: 1.0,
            },
        }
    }

    pub fn custom<F>(f: F) -> InitialProfile
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        InitialProfile::Custom(ProfileFn::new(f))
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        match self {
            InitialProfile::Sine { mode, amplitude } => {
                if *mode == 0 {
                    return Err(SolverError::InvalidProfile("sine mode must be >= 1".into()));
                }
                if !amplitude.is_finite() {
                    return Err(SolverError::InvalidProfile("sine amplitude not finite".into()));
                }
            }
            InitialProfile::Bump { start, end, value } => {
                if !(start.is_finite() && end.is_finite() && value.is_finite()) {
                    return Err(SolverError::InvalidProfile("bump bounds not finite".into()));
                }
                if start >= end {
                    return Err(SolverError::InvalidProfile(format!(
                        "bump start {start} must be < end {end}"
                    )));
                }
            }
            InitialProfile::Gaussians { blobs } => {
                for b in blobs {
                    if !(b.width.is_finite() && b.width > 0.0) {
                        return Err(SolverError::InvalidProfile(format!(
                            "gaussian width must be positive, got {}",
                            b.width
                        )));
                    }
                    if !(b.center.is_finite() && b.amplitude.is_finite()) {
                        return Err(SolverError::InvalidProfile("gaussian not finite".into()));
                    }
                }
            }
            InitialProfile::Custom(_) => {}
        }
        Ok(())
    }

    pub fn eval(&self, x: f64, length: f64) -> f64 {
        match self {
            InitialProfile::Sine { mode, amplitude } => {
                amplitude * (*mode as f64 * PI * x / length).sin()
            }
            InitialProfile::Bump { start, end, value } => {
                if x > *start && x < *end {
                    *value
                } else {
                    0.0
                }
            }
            InitialProfile::Gaussians { blobs } => blobs
                .iter()
                .map(|b| {
                    let d = x - b.center;
                    b.amplitude * (-0.5 * d * d / (b.width * b.width)).exp()
                })
                .sum(),
            InitialProfile::Custom(f) => (f.0)(x),
        }
    }

    /// Reject profiles that produce NaN or infinity at any of the nodes `x`.
    pub fn check_finite(&self, x: &[f64], length: f64) -> Result<(), SolverError> {
        for &xi in x {
            let u = self.eval(xi, length);
            if !u.is_finite() {
                return Err(SolverError::InvalidProfile(format!(
                    "profile is {u} at x = {xi}"
                )));
            }
        }
        Ok(())
    }

    /// Sample the profile at every node into `out`.
    pub fn fill(&self, x: &[f64], length: f64, out: &mut [f64]) {
        for (o, &xi) in out.iter_mut().zip(x) {
            *o = self.eval(xi, length);
        }
    }
}
