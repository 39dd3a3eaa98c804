use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::grid::Grid;
use crate::profile::InitialProfile;
use crate::scheme::{DiffusionBootstrap, EquationKind, SchemeKind};

pub const DEFAULT_NODES: usize = 100;
pub const DEFAULT_LENGTH: f64 = 1.0;

/// Everything needed to build a [`crate::SimulationEngine`].
///
/// Missing fields fall back to the reference setup: 100 intervals on
/// `[0, 1]`, each scheme's own time-step policy, and the reference profile
/// of the chosen equation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub nodes: usize,
    pub length: f64,
    pub equation: EquationKind,
    pub profile: Option<InitialProfile>,
    pub tau: Option<f64>,
    pub diffusion_bootstrap: DiffusionBootstrap,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            nodes: DEFAULT_NODES,
            length: DEFAULT_LENGTH,
            equation: EquationKind::default(),
            profile: None,
            tau: None,
            diffusion_bootstrap: DiffusionBootstrap::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(equation: EquationKind) -> Self {
        SimulationConfig {
            equation,
            ..Default::default()
        }
    }

    pub fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn with_tau(mut self, tau: f64) -> Self {
        self.tau = Some(tau);
        self
    }

    pub fn with_profile(mut self, profile: InitialProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: DiffusionBootstrap) -> Self {
        self.diffusion_bootstrap = bootstrap;
        self
    }

    pub fn resolved_profile(&self) -> InitialProfile {
        self.profile
            .clone()
            .unwrap_or_else(|| InitialProfile::reference(self.equation))
    }

    /// Build the grid and scheme this configuration describes.
    pub fn build(&self) -> Result<(Grid, SchemeKind, InitialProfile), SolverError> {
        let grid = Grid::new(self.nodes, self.length)?;
        let profile = self.resolved_profile();
        profile.validate()?;
        profile.check_finite(grid.x(), grid.length())?;
        let scheme = SchemeKind::new(self.equation, &grid, self.tau, self.diffusion_bootstrap)?;
        Ok((grid, scheme, profile))
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        self.build().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_reference_values() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.nodes, 100);
        assert_eq!(cfg.length, 1.0);
        assert_eq!(cfg.equation, EquationKind::Wave);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected_before_build() {
        assert_eq!(
            SimulationConfig::default().with_nodes(1).validate(),
            Err(SolverError::TooFewNodes(1))
        );
        assert!(matches!(
            SimulationConfig::default().with_length(0.0).validate(),
            Err(SolverError::NonPositiveLength(_))
        ));
        assert!(matches!(
            SimulationConfig::new(EquationKind::Wave)
                .with_tau(0.02)
                .validate(),
            Err(SolverError::Unstable { .. })
        ));
    }

    #[test]
    fn diffusion_accepts_large_mesh_ratio() {
        // tau / h^2 = 50, far past the explicit limit
        let cfg = SimulationConfig::new(EquationKind::Diffusion).with_tau(0.005);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn profile_falls_back_to_reference() {
        let cfg = SimulationConfig::new(EquationKind::Diffusion);
        assert!(matches!(cfg.resolved_profile(), InitialProfile::Bump { .. }));
    }

    #[test]
    fn non_finite_profile_fails_before_bootstrap() {
        // x[50] = 0.5 on the reference grid
        let cfg = SimulationConfig::new(EquationKind::Wave)
            .with_profile(InitialProfile::custom(|x| 1.0 / (x - 0.5)));
        assert!(matches!(cfg.validate(), Err(SolverError::InvalidProfile(_))));
        assert!(crate::SimulationEngine::new(&cfg).is_err());

        // non-finite values off the grid nodes are never sampled
        let cfg = SimulationConfig::new(EquationKind::Wave)
            .with_nodes(4)
            .with_profile(InitialProfile::custom(|x| 1.0 / (x - 0.3)));
        assert!(cfg.validate().is_ok());
    }
}
