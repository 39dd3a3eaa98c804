//! Dufort-Frankel ("rhombus") scheme for `u_t = u_xx` with zero-temperature ends.
//!
//! ```text
//! u[j+1][i] = ((1 - lambda) u[j-1][i] + lambda (u[j][i+1] + u[j][i-1])) / (1 + lambda)
//! lambda    = 2 tau / h^2
//! ```
//!
//! Unconditionally stable, but only consistent with the heat equation when
//! `tau / h -> 0`; otherwise it carries an `O((tau/h)^2)` error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SolverError;
use crate::grid::Grid;
use crate::layers::{LayerSet, apply_dirichlet};
use crate::profile::InitialProfile;

pub const DEFAULT_TAU: f64 = 0.0005;
pub const DEFAULT_SAFETY: f64 = 0.8;

/// FTCS is stable for `tau / h^2 <= EXPLICIT_LIMIT`.
pub const EXPLICIT_LIMIT: f64 = 0.5;

/// Upper bound on sub-steps, so `initialize()` stays a bounded scan.
pub const MAX_BOOTSTRAP_SUBSTEPS: usize = 10_000;

/// How the second layer is produced from the initial profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffusionBootstrap {
    /// One forward-time centered-space step of size `tau`.
    Explicit,
    /// `k` FTCS sub-steps of size `tau / k`, each within `safety * EXPLICIT_LIMIT`.
    Substepped { safety: f64 },
}

impl Default for DiffusionBootstrap {
    fn default() -> Self {
        DiffusionBootstrap::Substepped {
            safety: DEFAULT_SAFETY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionScheme {
    tau: f64,
    bootstrap: DiffusionBootstrap,
}

impl DiffusionScheme {
    pub fn new(
        grid: &Grid,
        tau: Option<f64>,
        bootstrap: DiffusionBootstrap,
    ) -> Result<DiffusionScheme, SolverError> {
        let tau = tau.unwrap_or(DEFAULT_TAU);
        if !(tau.is_finite() && tau > 0.0) {
            return Err(SolverError::InvalidTimeStep(tau));
        }
        if let DiffusionBootstrap::Substepped { safety } = bootstrap {
            if !(safety > 0.0 && safety <= 1.0) {
                return Err(SolverError::InvalidSafety(safety));
            }
        }

        let scheme = DiffusionScheme { tau, bootstrap };
        let required = scheme.required_substeps(grid);
        if !(required <= MAX_BOOTSTRAP_SUBSTEPS as f64) {
            warn!(tau, required, "rejecting diffusion bootstrap that needs too many sub-steps");
            return Err(SolverError::TooManySubsteps {
                required,
                max: MAX_BOOTSTRAP_SUBSTEPS,
            });
        }

        let lambda = scheme.lambda(grid);
        if !lambda.is_finite() {
            return Err(SolverError::DegenerateArithmetic {
                context: "lambda = 2 tau / h^2",
                value: lambda,
            });
        }
        let denom = 1.0 + lambda;
        if denom == 0.0 || !denom.is_finite() {
            return Err(SolverError::DegenerateArithmetic {
                context: "1 + lambda",
                value: denom,
            });
        }
        Ok(scheme)
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn bootstrap_policy(&self) -> DiffusionBootstrap {
        self.bootstrap
    }

    /// `tau / h^2`, the explicit-scheme mesh ratio.
    pub fn sigma(&self, grid: &Grid) -> f64 {
        self.tau / (grid.h() * grid.h())
    }

    pub fn lambda(&self, grid: &Grid) -> f64 {
        2.0 * self.tau / (grid.h() * grid.h())
    }

    /// Sub-step count before any cap, kept in `f64` so huge ratios don't saturate.
    fn required_substeps(&self, grid: &Grid) -> f64 {
        match self.bootstrap {
            DiffusionBootstrap::Explicit => 1.0,
            DiffusionBootstrap::Substepped { safety } => {
                let dt_max = EXPLICIT_LIMIT * grid.h() * grid.h();
                (self.tau / (safety * dt_max)).ceil().max(1.0)
            }
        }
    }

    /// Number of FTCS sub-steps the bootstrap takes, at most
    /// [`MAX_BOOTSTRAP_SUBSTEPS`].
    pub fn substeps(&self, grid: &Grid) -> usize {
        let k = self.required_substeps(grid);
        if k >= MAX_BOOTSTRAP_SUBSTEPS as f64 {
            MAX_BOOTSTRAP_SUBSTEPS
        } else {
            k as usize
        }
    }

    pub fn bootstrap(&self, grid: &Grid, profile: &InitialProfile, layers: &mut LayerSet) {
        layers.clear();
        {
            let (prev, curr) = layers.seed_mut();
            profile.fill(grid.x(), grid.length(), prev);
            apply_dirichlet(prev);
            curr.copy_from_slice(prev);
        }

        let k = self.substeps(grid);
        let sigma = self.sigma(grid) / k as f64;
        if sigma > EXPLICIT_LIMIT {
            warn!(
                sigma,
                "single-step diffusion bootstrap exceeds the explicit stability limit"
            );
        }

        let (curr, next) = layers.scratch_pair();
        for _ in 0..k {
            ftcs_step(grid, curr.as_slice(), next.as_mut_slice(), sigma);
            std::mem::swap(curr, next);
        }
        next.fill(0.0);
    }

    pub fn step(&self, grid: &Grid, layers: &mut LayerSet) {
        let lambda = self.lambda(grid);
        let denom = 1.0 + lambda;
        let (prev, curr, next) = layers.step_view();

        for i in grid.interior() {
            let decay = (1.0 - lambda) * prev[i];
            let spread = lambda * (curr[i + 1] + curr[i - 1]);
            next[i] = (decay + spread) / denom;
        }
        apply_dirichlet(next);
    }
}

fn ftcs_step(grid: &Grid, src: &[f64], dst: &mut [f64], sigma: f64) {
    for i in grid.interior() {
        dst[i] = src[i] + sigma * (src[i + 1] - 2.0 * src[i] + src[i - 1]);
    }
    apply_dirichlet(dst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> Grid {
        Grid::new(100, 1.0).unwrap()
    }

    #[test]
    fn reference_ratios() {
        let g = grid();
        let d = DiffusionScheme::new(&g, None, DiffusionBootstrap::Explicit).unwrap();
        assert_relative_eq!(d.tau(), 0.0005);
        assert_relative_eq!(d.sigma(&g), 5.0, epsilon = 1e-9);
        assert_relative_eq!(d.lambda(&g), 10.0, epsilon = 1e-9);
        assert_eq!(d.substeps(&g), 1);
    }

    #[test]
    fn substep_count_respects_safety() {
        let g = grid();
        let d = DiffusionScheme::new(&g, None, DiffusionBootstrap::default()).unwrap();
        // sigma = 5, per-substep limit 0.4
        assert_eq!(d.substeps(&g), 13);
        assert!(d.sigma(&g) / d.substeps(&g) as f64 <= 0.4);

        let small = DiffusionScheme::new(&g, Some(1e-6), DiffusionBootstrap::default()).unwrap();
        assert_eq!(small.substeps(&g), 1);
    }

    #[test]
    fn rejects_bad_safety() {
        let g = grid();
        for safety in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                DiffusionScheme::new(&g, None, DiffusionBootstrap::Substepped { safety }),
                Err(SolverError::InvalidSafety(_))
            ));
        }
    }

    #[test]
    fn overflowing_lambda_is_degenerate() {
        let g = grid();
        let err = DiffusionScheme::new(&g, Some(1e306), DiffusionBootstrap::Explicit)
            .unwrap_err();
        assert!(matches!(err, SolverError::DegenerateArithmetic { .. }));
        assert!(!err.is_configuration());
    }

    #[test]
    fn huge_tau_rejects_substepped_bootstrap() {
        let g = grid();
        for tau in [1e3, 1e6, 1e12] {
            let err = DiffusionScheme::new(&g, Some(tau), DiffusionBootstrap::default())
                .unwrap_err();
            match err {
                SolverError::TooManySubsteps { required, max } => {
                    assert!(required > MAX_BOOTSTRAP_SUBSTEPS as f64);
                    assert_eq!(max, MAX_BOOTSTRAP_SUBSTEPS);
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(err.is_configuration());
        }

        // one explicit step is always bounded
        let d = DiffusionScheme::new(&g, Some(1e6), DiffusionBootstrap::Explicit).unwrap();
        assert_eq!(d.substeps(&g), 1);
    }

    #[test]
    fn substep_cap_is_inclusive() {
        let g = grid();
        // k = tau / (0.4 h^2) lands just under the cap
        let tau = 0.4 * g.h() * g.h() * (MAX_BOOTSTRAP_SUBSTEPS as f64 - 0.5);
        let d = DiffusionScheme::new(&g, Some(tau), DiffusionBootstrap::default()).unwrap();
        assert_eq!(d.substeps(&g), MAX_BOOTSTRAP_SUBSTEPS);
    }

    #[test]
    fn explicit_bootstrap_matches_ftcs_formula() {
        let g = grid();
        let d = DiffusionScheme::new(&g, None, DiffusionBootstrap::Explicit).unwrap();
        let mut layers = LayerSet::new(g.len());
        let profile = InitialProfile::Gaussians {
            blobs: vec![crate::profile::Gaussian {
                center: 0.5,
                width: 0.1,
                amplitude: 1.0,
            }],
        };
        d.bootstrap(&g, &profile, &mut layers);

        let p = layers.prev();
        let sigma = d.sigma(&g);
        for i in [10, 37, 50, 88] {
            let expected = p[i] + sigma * (p[i + 1] - 2.0 * p[i] + p[i - 1]);
            assert_relative_eq!(layers.curr()[i], expected, epsilon = 1e-12);
        }
        assert_eq!(layers.next(), vec![0.0; g.len()].as_slice());
    }

    #[test]
    fn step_keeps_uniform_interior_between_zero_ends_bounded() {
        let g = Grid::new(20, 1.0).unwrap();
        let d = DiffusionScheme::new(&g, Some(0.01), DiffusionBootstrap::default()).unwrap();
        let mut layers = LayerSet::new(g.len());
        d.bootstrap(&g, &InitialProfile::custom(|_| 1.0), &mut layers);
        for _ in 0..200 {
            d.step(&g, &mut layers);
            layers.rotate();
        }
        assert!(layers.curr().iter().all(|v| v.abs() <= 1.0));
        assert_eq!(layers.curr()[0], 0.0);
        assert_eq!(layers.curr()[20], 0.0);
    }
}
