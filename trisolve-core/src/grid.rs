use crate::error::SolverError;

/// Uniform discretization of `[0, L]` into `N` intervals (`N + 1` nodes).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    n: usize,
    length: f64,
    h: f64,
    x: Vec<f64>,
}

impl Grid {
    pub fn new(n: usize, length: f64) -> Result<Grid, SolverError> {
        if n < 2 {
            return Err(SolverError::TooFewNodes(n));
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(SolverError::NonPositiveLength(length));
        }
        let h = length / n as f64;
        let mut x: Vec<f64> = (0..=n).map(|i| i as f64 * h).collect();
        // i * h can land an ulp away from L
        x[n] = length;

        Ok(Grid { n, length, h, x })
    }

    /// Number of intervals; the grid has `n() + 1` nodes.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.n + 1
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Indices `1..N`, i.e. every node that is not a boundary.
    pub fn interior(&self) -> std::ops::Range<usize> {
        1..self.n
    }
}
