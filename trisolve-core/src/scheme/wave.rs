//! Explicit "cross" (leapfrog) scheme for `u_tt = u_xx` with rigid ends.
//!
//! ```text
//! u[j+1][i] = 2 u[j][i] - u[j-1][i] + r (u[j][i+1] - 2 u[j][i] + u[j][i-1]),   r = (tau/h)^2
//! ```
//!
//! Stable while `r <= 1`. The default time step is half the Courant limit.

use tracing::warn;

use crate::error::SolverError;
use crate::grid::Grid;
use crate::layers::{LayerSet, apply_dirichlet};
use crate::profile::InitialProfile;

/// Default Courant number `tau / h`.
pub const DEFAULT_COURANT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveScheme {
    tau: f64,
}

impl WaveScheme {
    /// Build with `tau = DEFAULT_COURANT * h` unless `tau` is given, in which
    /// case it must keep `(tau/h)^2 <= 1`.
    pub fn new(grid: &Grid, tau: Option<f64>) -> Result<WaveScheme, SolverError> {
        let tau = tau.unwrap_or(DEFAULT_COURANT * grid.h());
        if !(tau.is_finite() && tau > 0.0) {
            return Err(SolverError::InvalidTimeStep(tau));
        }

        let scheme = WaveScheme { tau };
        let r = scheme.courant_squared(grid);
        if !(r <= 1.0) {
            warn!(tau, h = grid.h(), r, "rejecting unstable wave time step");
            return Err(SolverError::Unstable { courant_squared: r });
        }
        Ok(scheme)
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn courant_squared(&self, grid: &Grid) -> f64 {
        let c = self.tau / grid.h();
        c * c
    }

    /// Level 0 from the profile, level 1 from a second-order Taylor step
    /// with zero initial velocity: `u1 = u0 + tau^2/2 * u0_xx`.
    pub fn bootstrap(&self, grid: &Grid, profile: &InitialProfile, layers: &mut LayerSet) {
        layers.clear();
        let (prev, curr) = layers.seed_mut();

        profile.fill(grid.x(), grid.length(), prev);
        apply_dirichlet(prev);

        let h2 = grid.h() * grid.h();
        let half_tau2 = 0.5 * self.tau * self.tau;
        for i in grid.interior() {
            let u_xx = (prev[i + 1] - 2.0 * prev[i] + prev[i - 1]) / h2;
            curr[i] = prev[i] + half_tau2 * u_xx;
        }
        apply_dirichlet(curr);
    }

    pub fn step(&self, grid: &Grid, layers: &mut LayerSet) {
        let r = self.courant_squared(grid);
        let (prev, curr, next) = layers.step_view();

        for i in grid.interior() {
            next[i] = 2.0 * curr[i] - prev[i] + r * (curr[i + 1] - 2.0 * curr[i] + curr[i - 1]);
        }
        apply_dirichlet(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> (Grid, InitialProfile) {
        (
            Grid::new(100, 1.0).unwrap(),
            InitialProfile::Sine {
                mode: 1,
                amplitude: 1.0,
            },
        )
    }

    #[test]
    fn default_tau_is_half_h() {
        let (grid, _) = reference();
        let w = WaveScheme::new(&grid, None).unwrap();
        assert_relative_eq!(w.tau(), 0.005);
        assert_relative_eq!(w.courant_squared(&grid), 0.25);
    }

    #[test]
    fn courant_limit_is_inclusive() {
        let (grid, _) = reference();
        assert!(WaveScheme::new(&grid, Some(grid.h())).is_ok());

        let err = WaveScheme::new(&grid, Some(1.5 * grid.h())).unwrap_err();
        match err {
            SolverError::Unstable { courant_squared } => {
                assert_relative_eq!(courant_squared, 2.25, epsilon = 1e-12)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_tau() {
        let (grid, _) = reference();
        assert_eq!(
            WaveScheme::new(&grid, Some(0.0)),
            Err(SolverError::InvalidTimeStep(0.0))
        );
        assert!(WaveScheme::new(&grid, Some(f64::NAN)).is_err());
    }

    #[test]
    fn bootstrap_pins_boundaries() {
        let (grid, profile) = reference();
        let w = WaveScheme::new(&grid, None).unwrap();
        let mut layers = LayerSet::new(grid.len());
        w.bootstrap(&grid, &profile, &mut layers);

        assert_eq!(layers.prev()[0], 0.0);
        assert_eq!(layers.prev()[100], 0.0);
        assert_eq!(layers.curr()[0], 0.0);
        assert_eq!(layers.curr()[100], 0.0);
        // curvature of sin pulls the midpoint down
        assert!(layers.curr()[50] < layers.prev()[50]);
    }

    #[test]
    fn flat_field_stays_flat() {
        let grid = Grid::new(10, 1.0).unwrap();
        let w = WaveScheme::new(&grid, None).unwrap();
        let mut layers = LayerSet::new(grid.len());
        w.bootstrap(&grid, &InitialProfile::custom(|_| 0.0), &mut layers);
        w.step(&grid, &mut layers);
        assert!(layers.next().iter().all(|&v| v == 0.0));
    }
}
