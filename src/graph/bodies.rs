//! Kinematic state of every node in Structure of Arrays layout.
//!
//! Forces read positions and add to velocities. Only the simulation driver
//! moves positions, and only the interaction layer sets or clears pins.

/// Positions, velocities and pins, one slot per node.
#[derive(Debug, Clone, Default)]
pub struct Bodies {
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
    pub(crate) vx: Vec<f64>,
    pub(crate) vy: Vec<f64>,
    pins: Vec<Option<(f64, f64)>>,
}

impl Bodies {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            vx: Vec::with_capacity(capacity),
            vy: Vec::with_capacity(capacity),
            pins: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
        self.vx.push(0.0);
        self.vy.push(0.0);
        self.pins.push(None);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    pub fn position(&self, i: usize) -> (f64, f64) {
        (self.x[i], self.y[i])
    }

    #[inline]
    pub fn velocity(&self, i: usize) -> (f64, f64) {
        (self.vx[i], self.vy[i])
    }

    /// Pinned position of a node, if it is pinned.
    #[inline]
    pub fn pin(&self, i: usize) -> Option<(f64, f64)> {
        self.pins[i]
    }

    pub fn positions_x(&self) -> &[f64] {
        &self.x
    }

    pub fn positions_y(&self) -> &[f64] {
        &self.y
    }

    /// Add a velocity contribution to one node.
    #[inline]
    pub fn accelerate(&mut self, i: usize, dvx: f64, dvy: f64) {
        self.vx[i] += dvx;
        self.vy[i] += dvy;
    }

    /// Mean position of all nodes, or None if there are none.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let n = self.len() as f64;
        let sx: f64 = self.x.iter().sum();
        let sy: f64 = self.y.iter().sum();
        Some((sx / n, sy / n))
    }

    pub(crate) fn set_pin(&mut self, i: usize, x: f64, y: f64) {
        self.pins[i] = Some((x, y));
    }

    pub(crate) fn clear_pin(&mut self, i: usize) {
        self.pins[i] = None;
    }

    /// Apply friction and move every free node by its velocity. Pinned
    /// nodes snap to their pin and lose their velocity.
    pub(crate) fn integrate(&mut self, retain: f64) {
        for i in 0..self.len() {
            match self.pins[i] {
                Some((fx, fy)) => {
                    self.x[i] = fx;
                    self.y[i] = fy;
                    self.vx[i] = 0.0;
                    self.vy[i] = 0.0;
                }
                None => {
                    self.vx[i] *= retain;
                    self.vy[i] *= retain;
                    self.x[i] += self.vx[i];
                    self.y[i] += self.vy[i];
                }
            }
        }
    }
}
