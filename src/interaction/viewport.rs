//! Pan and zoom.
//!
//! The viewport maps simulation coordinates to screen coordinates with a
//! translate + uniform scale. It is applied by the renderer only and holds
//! no reference to the simulation, so panning and zooming can neither move
//! nodes nor be disturbed by them.

use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::error::ConfigError;

/// Zoom factor per pixel of wheel delta (`2^(-dy * WHEEL_RATE)`).
pub const WHEEL_RATE: f64 = 0.002;

/// `screen = sim * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// Simulation point to screen point.
    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x * self.k + self.x, y * self.k + self.y)
    }

    /// Screen point to simulation point.
    pub fn invert(&self, (x, y): (f64, f64)) -> (f64, f64) {
        ((x - self.x) / self.k, (y - self.y) / self.k)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.k.is_finite()
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    transform: ViewTransform,
    min_scale: f64,
    max_scale: f64,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let [min_scale, max_scale] = config.scale_extent;
        Ok(Self {
            transform: ViewTransform::IDENTITY,
            min_scale,
            max_scale,
        })
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scale_extent(&self) -> [f64; 2] {
        [self.min_scale, self.max_scale]
    }

    /// Pan by a screen-space delta.
    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.transform.x += dx;
            self.transform.y += dy;
        }
    }

    /// Multiply the scale by `factor`, keeping the screen point `anchor`
    /// fixed. The result is clamped to the scale extent.
    pub fn scale_by(&mut self, factor: f64, anchor: (f64, f64)) {
        self.scale_to(self.transform.k * factor, anchor);
    }

    /// Set the scale, keeping the screen point `anchor` fixed.
    pub fn scale_to(&mut self, k: f64, anchor: (f64, f64)) {
        if !(k.is_finite() && anchor.0.is_finite() && anchor.1.is_finite()) {
            return;
        }
        let k = k.clamp(self.min_scale, self.max_scale);
        let (px, py) = self.transform.invert(anchor);
        self.transform = ViewTransform {
            x: anchor.0 - px * k,
            y: anchor.1 - py * k,
            k,
        };
    }

    /// Zoom for a wheel event of `delta_y` pixels at `anchor`.
    pub fn wheel(&mut self, delta_y: f64, anchor: (f64, f64)) {
        self.scale_by(2f64.powf(-delta_y * WHEEL_RATE), anchor);
    }

    /// Restore a persisted transform, clamping its scale. Returns false and
    /// changes nothing if any component is non-finite.
    pub fn set_transform(&mut self, transform: ViewTransform) -> bool {
        if !transform.is_finite() {
            return false;
        }
        self.transform = ViewTransform {
            k: transform.k.clamp(self.min_scale, self.max_scale),
            ..transform
        };
        true
    }

    pub fn reset(&mut self) {
        self.transform = ViewTransform::IDENTITY;
    }

    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        self.transform.apply(point)
    }

    pub fn invert(&self, point: (f64, f64)) -> (f64, f64) {
        self.transform.invert(point)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let [min_scale, max_scale] = ViewportConfig::default().scale_extent;
        Self {
            transform: ViewTransform::IDENTITY,
            min_scale,
            max_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_apply_invert() {
        let t = ViewTransform {
            x: 10.0,
            y: -5.0,
            k: 2.0,
        };
        assert_eq!(t.apply((3.0, 4.0)), (16.0, 3.0));
        assert!(close(t.invert(t.apply((3.0, 4.0))), (3.0, 4.0)));
    }

    #[test]
    fn test_scale_keeps_anchor_fixed() {
        let mut viewport = Viewport::default();
        viewport.translate_by(20.0, 30.0);
        let anchor = (200.0, 150.0);
        let under = viewport.invert(anchor);

        viewport.scale_by(2.0, anchor);
        assert_eq!(viewport.transform().k, 2.0);
        assert!(close(viewport.apply(under), anchor));

        viewport.wheel(-250.0, anchor);
        assert!((viewport.transform().k - 2.0 * 2f64.sqrt()).abs() < 1e-9);
        assert!(close(viewport.apply(under), anchor));
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut viewport = Viewport::default();
        viewport.scale_by(100.0, (0.0, 0.0));
        assert_eq!(viewport.transform().k, 4.0);
        viewport.scale_to(0.0001, (0.0, 0.0));
        assert_eq!(viewport.transform().k, 0.1);

        assert!(viewport.set_transform(ViewTransform {
            x: 107.5,
            y: 145.2,
            k: 0.01,
        }));
        assert_eq!(
            viewport.transform(),
            ViewTransform {
                x: 107.5,
                y: 145.2,
                k: 0.1
            }
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut viewport = Viewport::default();
        assert!(!viewport.set_transform(ViewTransform {
            x: f64::NAN,
            y: 0.0,
            k: 1.0,
        }));
        viewport.translate_by(f64::INFINITY, 0.0);
        viewport.scale_by(f64::NAN, (0.0, 0.0));
        assert_eq!(viewport.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn test_custom_extent() {
        let config = ViewportConfig {
            scale_extent: [0.5, 2.0],
        };
        let mut viewport = Viewport::new(&config).unwrap();
        viewport.scale_by(10.0, (0.0, 0.0));
        assert_eq!(viewport.transform().k, 2.0);
        viewport.reset();
        assert_eq!(viewport.transform(), ViewTransform::IDENTITY);

        let bad = ViewportConfig {
            scale_extent: [3.0, 1.0],
        };
        assert!(Viewport::new(&bad).is_err());
    }
}
