//! Deterministic jitter for separating coincident nodes.
//!
//! Two nodes at exactly the same spot have no direction to push apart in,
//! so forces nudge them by a tiny random offset. The offsets come from a
//! seeded linear congruential generator owned by each simulation, which
//! keeps layouts reproducible for a fixed seed and isolates simulations
//! from each other.

const A: u32 = 1_664_525;
const C: u32 = 1_013_904_223;
const M: f64 = 4_294_967_296.0; // 2^32

/// Magnitude of a single jiggle.
const SPREAD: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct Jiggle {
    state: u32,
}

impl Jiggle {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        // Wrapping u32 arithmetic is exactly `(A * s + C) mod 2^32`.
        self.state = self.state.wrapping_mul(A).wrapping_add(C);
        self.state as f64 / M
    }

    /// A tiny signed offset in `[-SPREAD / 2, SPREAD / 2)`.
    pub fn offset(&mut self) -> f64 {
        (self.next_unit() - 0.5) * SPREAD
    }
}

impl Default for Jiggle {
    fn default() -> Self {
        Self::new(1)
    }
}
