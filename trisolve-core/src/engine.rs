use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::SolverError;
use crate::grid::Grid;
use crate::layers::LayerSet;
use crate::profile::InitialProfile;
use crate::scheme::{EquationKind, SchemeKind};
use crate::tick::TickSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
}

/// Borrowed view of the current layer, handed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct LayerView<'a> {
    pub values: &'a [f64],
    pub step: u64,
    pub time: f64,
}

impl LayerView<'_> {
    pub fn max_abs(&self) -> f64 {
        max_abs(self.values)
    }

    pub fn energy(&self) -> f64 {
        energy(self.values)
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            values: self.values.to_vec(),
            step: self.step,
            time: self.time,
        }
    }
}

/// Owned copy of a [`LayerView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub values: Vec<f64>,
    pub step: u64,
    pub time: f64,
}

impl Snapshot {
    pub fn max_abs(&self) -> f64 {
        max_abs(&self.values)
    }

    pub fn energy(&self) -> f64 {
        energy(&self.values)
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

/// Discrete `sum u_i^2`.
fn energy(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// Drives one scheme over one grid.
///
/// Starts `Uninitialized`; [`initialize`](Self::initialize) bootstraps the
/// first two layers and moves it to `Running`, where every
/// [`advance`](Self::advance) computes `next`, rotates, and bumps the step
/// counter. Calling `initialize` again restarts from the same initial state.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    grid: Grid,
    layers: LayerSet,
    scheme: SchemeKind,
    profile: InitialProfile,
    time_step: u64,
    state: EngineState,
}

impl SimulationEngine {
    pub fn new(config: &SimulationConfig) -> Result<SimulationEngine, SolverError> {
        let (grid, scheme, profile) = config.build()?;
        info!(
            equation = %scheme.kind(),
            nodes = grid.n(),
            h = grid.h(),
            tau = scheme.tau(),
            "created simulation engine"
        );

        Ok(SimulationEngine {
            layers: LayerSet::new(grid.len()),
            grid,
            scheme,
            profile,
            time_step: 0,
            state: EngineState::Uninitialized,
        })
    }

    /// Shorthand for `new` followed by `initialize`.
    pub fn start(config: &SimulationConfig) -> Result<SimulationEngine, SolverError> {
        let mut engine = SimulationEngine::new(config)?;
        engine.initialize();
        Ok(engine)
    }

    pub fn initialize(&mut self) {
        self.scheme.bootstrap(&self.grid, &self.profile, &mut self.layers);
        self.time_step = 0;
        self.state = EngineState::Running;
        debug!(equation = %self.scheme.kind(), "bootstrapped initial layers");
    }

    pub fn advance(&mut self) -> Result<(), SolverError> {
        if self.state != EngineState::Running {
            return Err(SolverError::NotInitialized);
        }
        self.scheme.step(&self.grid, &mut self.layers);
        self.layers.rotate();
        self.time_step += 1;
        trace!(step = self.time_step, "advanced one layer");
        Ok(())
    }

    pub fn current_layer(&self) -> LayerView<'_> {
        LayerView {
            values: self.layers.curr(),
            step: self.time_step,
            time: self.simulated_time(),
        }
    }

    /// Step once per tick and hand each new layer to `on_tick`.
    /// Returns the number of steps taken.
    pub fn run<T, F>(&mut self, ticks: &mut T, mut on_tick: F) -> Result<u64, SolverError>
    where
        T: TickSource + ?Sized,
        F: FnMut(LayerView<'_>),
    {
        let mut taken = 0;
        while ticks.next_tick() {
            self.advance()?;
            taken += 1;
            on_tick(self.current_layer());
        }
        Ok(taken)
    }

    // ---- Accessors ----

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn scheme(&self) -> &SchemeKind {
        &self.scheme
    }

    pub fn equation(&self) -> EquationKind {
        self.scheme.kind()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    pub fn tau(&self) -> f64 {
        self.scheme.tau()
    }

    /// `time_step * tau`.
    pub fn simulated_time(&self) -> f64 {
        self.time_step as f64 * self.scheme.tau()
    }
}
