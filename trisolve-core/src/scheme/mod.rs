//! Three-layer time-stepping schemes.
//!
//! Each variant knows how to bootstrap the first two layers from an initial
//! profile and how to compute `next` from `prev` and `curr`.

pub mod diffusion;
pub mod wave;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::grid::Grid;
use crate::layers::LayerSet;
use crate::profile::InitialProfile;

pub use diffusion::{DiffusionBootstrap, DiffusionScheme};
pub use wave::WaveScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquationKind {
    #[default]
    Wave,
    Diffusion,
}

impl EquationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquationKind::Wave => "wave",
            EquationKind::Diffusion => "diffusion",
        }
    }
}

impl fmt::Display for EquationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wave" => Ok(EquationKind::Wave),
            "diffusion" | "heat" => Ok(EquationKind::Diffusion),
            other => Err(format!("unknown equation kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemeKind {
    Wave(WaveScheme),
    Diffusion(DiffusionScheme),
}

impl SchemeKind {
    pub fn new(
        kind: EquationKind,
        grid: &Grid,
        tau: Option<f64>,
        bootstrap: DiffusionBootstrap,
    ) -> Result<SchemeKind, SolverError> {
        Ok(match kind {
            EquationKind::Wave => SchemeKind::Wave(WaveScheme::new(grid, tau)?),
            EquationKind::Diffusion => {
                SchemeKind::Diffusion(DiffusionScheme::new(grid, tau, bootstrap)?)
            }
        })
    }

    pub fn kind(&self) -> EquationKind {
        match self {
            SchemeKind::Wave(_) => EquationKind::Wave,
            SchemeKind::Diffusion(_) => EquationKind::Diffusion,
        }
    }

    pub fn tau(&self) -> f64 {
        match self {
            SchemeKind::Wave(s) => s.tau(),
            SchemeKind::Diffusion(s) => s.tau(),
        }
    }

    pub fn bootstrap(&self, grid: &Grid, profile: &InitialProfile, layers: &mut LayerSet) {
        match self {
            SchemeKind::Wave(s) => s.bootstrap(grid, profile, layers),
            SchemeKind::Diffusion(s) => s.bootstrap(grid, profile, layers),
        }
    }

    pub fn step(&self, grid: &Grid, layers: &mut LayerSet) {
        match self {
            SchemeKind::Wave(s) => s.step(grid, layers),
            SchemeKind::Diffusion(s) => s.step(grid, layers),
        }
    }
}
