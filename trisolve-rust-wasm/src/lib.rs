use wasm_bindgen::prelude::*;
use trisolve_core::{EquationKind, SimulationConfig, SimulationEngine};

#[wasm_bindgen]
pub struct Solver {
    inner: SimulationEngine,
}

#[wasm_bindgen]
impl Solver {
    /// Reference setup for `equation` ("wave" or "diffusion") on `nodes` intervals.
    #[wasm_bindgen(constructor)]
    pub fn new(nodes: usize, equation: &str) -> Result<Solver, JsValue> {
        let kind: EquationKind = equation.parse().map_err(|e: String| JsValue::from_str(&e))?;
        let cfg = SimulationConfig::new(kind).with_nodes(nodes);
        let inner = SimulationEngine::start(&cfg).map_err(to_js)?;
        Ok(Solver { inner })
    }

    // Restart button
    pub fn initialize(&mut self) { self.inner.initialize(); }

    pub fn advance(&mut self) -> Result<(), JsValue> {
        self.inner.advance().map_err(to_js)
    }

    pub fn n(&self) -> usize { self.inner.grid().n() }
    pub fn tau(&self) -> f64 { self.inner.tau() }
    pub fn time(&self) -> f64 { self.inner.simulated_time() }
    pub fn step(&self) -> u64 { self.inner.time_step() }
    pub fn equation(&self) -> String { self.inner.equation().to_string() }

    // Copy-based JS access (reliable)
    pub fn get_layer(&self) -> Vec<f64> {
        self.inner.current_layer().values.to_vec()
    }

    pub fn get_x(&self) -> Vec<f64> {
        self.inner.grid().x().to_vec()
    }

    // Several steps per animation frame + timing (WASM-only)
    pub fn advance_many(&mut self, steps: u32) -> Result<StepInfo, JsValue> {
        let t0 = now_ms();
        for _ in 0..steps {
            self.inner.advance().map_err(to_js)?;
        }
        let t1 = now_ms();
        Ok(StepInfo { steps, compute_ms: t1 - t0, time: self.inner.simulated_time() })
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    steps: u32,
    compute_ms: f64,
    time: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn steps(&self) -> u32 { self.steps }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
    pub fn time(&self) -> f64 { self.time }
}

fn to_js(e: trisolve_core::SolverError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
