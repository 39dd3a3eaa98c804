/// The three active time levels of a three-layer scheme.
///
/// `prev` is level `j-1`, `curr` is level `j`, and `next` is scratch space
/// for level `j+1` that only becomes meaningful once a scheme has written it
/// and [`LayerSet::rotate`] has moved it into `curr`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSet {
    prev: Vec<f64>,
    curr: Vec<f64>,
    next: Vec<f64>,
}

impl LayerSet {
    pub fn new(len: usize) -> LayerSet {
        LayerSet {
            prev: vec![0.0; len],
            curr: vec![0.0; len],
            next: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.curr.len()
    }

    pub fn prev(&self) -> &[f64] {
        &self.prev
    }

    pub fn curr(&self) -> &[f64] {
        &self.curr
    }

    pub fn next(&self) -> &[f64] {
        &self.next
    }

    pub fn clear(&mut self) {
        self.prev.fill(0.0);
        self.curr.fill(0.0);
        self.next.fill(0.0);
    }

    /// Mutable access to the two bootstrap layers.
    pub fn seed_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.prev, &mut self.curr)
    }

    /// Read `prev`/`curr`, write `next`.
    pub fn step_view(&mut self) -> (&[f64], &[f64], &mut [f64]) {
        (&self.prev, &self.curr, &mut self.next)
    }

    /// `curr` and `next` as a ping-pong pair for auxiliary sub-steps.
    pub fn scratch_pair(&mut self) -> (&mut Vec<f64>, &mut Vec<f64>) {
        (&mut self.curr, &mut self.next)
    }

    /// `prev <- curr`, `curr <- next`, then reset the scratch layer.
    ///
    /// Buffers are exchanged rather than copied; the stale buffer that ends
    /// up in `next` is zeroed so its boundary entries stay at zero.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.curr);
        std::mem::swap(&mut self.curr, &mut self.next);
        self.next.fill(0.0);
    }
}

/// Pin both ends of a layer to zero.
pub fn apply_dirichlet(layer: &mut [f64]) {
    if let Some(first) = layer.first_mut() {
        *first = 0.0;
    }
    if let Some(last) = layer.last_mut() {
        *last = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_moves_roles_forward() {
        let mut layers = LayerSet::new(4);
        {
            let (prev, curr) = layers.seed_mut();
            prev.copy_from_slice(&[0.0, 1.0, 1.0, 0.0]);
            curr.copy_from_slice(&[0.0, 2.0, 2.0, 0.0]);
        }
        {
            let (_, _, next) = layers.step_view();
            next.copy_from_slice(&[0.0, 3.0, 3.0, 0.0]);
        }

        layers.rotate();

        assert_eq!(layers.prev(), &[0.0, 2.0, 2.0, 0.0]);
        assert_eq!(layers.curr(), &[0.0, 3.0, 3.0, 0.0]);
        assert_eq!(layers.next(), &[0.0; 4]);
    }

    #[test]
    fn rotated_buffers_do_not_alias() {
        let mut layers = LayerSet::new(3);
        layers.seed_mut().1[1] = 5.0;
        layers.rotate();
        layers.step_view().2[1] = 7.0;
        assert_eq!(layers.prev()[1], 5.0);
        assert_eq!(layers.curr()[1], 0.0);
    }

    #[test]
    fn dirichlet_zeroes_ends_only() {
        let mut v = vec![1.0, 2.0, 3.0];
        apply_dirichlet(&mut v);
        assert_eq!(v, vec![0.0, 2.0, 0.0]);

        let mut empty: Vec<f64> = Vec::new();
        apply_dirichlet(&mut empty);
        assert!(empty.is_empty());
    }
}
