//! Explicit three-layer finite-difference solvers on a 1-D grid.
//!
//! Two schemes share one engine: the leapfrog "cross" scheme for the wave
//! equation and the Dufort-Frankel "rhombus" scheme for the heat equation.
//! Both need two starting layers, which each scheme bootstraps from an
//! initial profile before the recurrence takes over.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod layers;
pub mod profile;
pub mod scheme;
pub mod shared;
pub mod tick;

pub use config::SimulationConfig;
pub use engine::{EngineState, LayerView, SimulationEngine, Snapshot};
pub use error::SolverError;
pub use grid::Grid;
pub use layers::LayerSet;
pub use profile::{Gaussian, InitialProfile, ProfileFn};
pub use scheme::{DiffusionBootstrap, DiffusionScheme, EquationKind, SchemeKind, WaveScheme};
pub use shared::SharedEngine;
pub use tick::{FixedRate, StopHandle, TickSource, Unpaced};
