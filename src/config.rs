//! Simulation, layout and viewport configuration.
//!
//! Every struct documents its defaults and deserializes from a camelCase
//! object with missing fields filled from [`Default`], so a JS host can pass
//! a partial options bag.

use serde::Deserialize;

use crate::error::ConfigError;

/// Smallest drawing surface the layout will assume, per axis.
pub const MIN_DIMENSION: f64 = 400.0;

/// Alpha decay that brings alpha from 1 to `alpha_min` in about 300 ticks.
pub fn default_alpha_decay() -> f64 {
    1.0 - 0.001_f64.powf(1.0 / 300.0)
}

/// Parameters of the simulation driver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Initial alpha (default: 1.0).
    pub alpha: f64,
    /// Threshold below which the simulation converges (default: 0.001).
    pub alpha_min: f64,
    /// Fraction of the gap to `alpha_target` closed per tick
    /// (default: `1 - 0.001^(1/300)` ≈ 0.0228).
    pub alpha_decay: f64,
    /// Value alpha decays toward (default: 0.0).
    pub alpha_target: f64,
    /// Fraction of velocity lost per tick (default: 0.4). Integration
    /// multiplies velocity by `1 - velocity_decay`.
    pub velocity_decay: f64,
    /// Seed of the jiggle generator (default: 1).
    pub seed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: default_alpha_decay(),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            seed: 1,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter lies in `[0, 1]`, with `alpha_min` and
    /// `alpha_decay` strictly positive so a run always converges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("alpha", self.alpha),
            ("alpha_min", self.alpha_min),
            ("alpha_decay", self.alpha_decay),
            ("alpha_target", self.alpha_target),
            ("velocity_decay", self.velocity_decay),
        ];
        for (parameter, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSimulation { parameter, value });
            }
        }
        for (parameter, value) in [
            ("alpha_min", self.alpha_min),
            ("alpha_decay", self.alpha_decay),
        ] {
            if value == 0.0 {
                return Err(ConfigError::InvalidSimulation { parameter, value });
            }
        }
        Ok(())
    }
}

/// Drawing surface size, floored at [`MIN_DIMENSION`] per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Clamp a measured container size. Zero, negative and non-finite
    /// values fall back to the floor.
    pub fn clamped(width: f64, height: f64) -> Self {
        let floor = |v: f64| if v.is_finite() { v.max(MIN_DIMENSION) } else { MIN_DIMENSION };
        Self {
            width: floor(width),
            height: floor(height),
        }
    }

    /// Middle of the surface.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Per-diagram layout options consumed by the presets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Container width (default: 400.0, floored at 400).
    pub width: f64,
    /// Container height (default: 400.0, floored at 400).
    pub height: f64,
    /// Drawn node radius; collision uses 1.5× this (default: 6.0).
    pub node_radius: f64,
    /// Many-body strength (default: -200.0).
    pub charge_strength: f64,
    /// Base link rest length (default: 40.0).
    pub link_distance: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: MIN_DIMENSION,
            height: MIN_DIMENSION,
            node_radius: 6.0,
            charge_strength: -200.0,
            link_distance: 40.0,
        }
    }
}

impl LayoutOptions {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::clamped(self.width, self.height)
    }
}

/// Viewport limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Allowed zoom range `[min, max]` (default: `[0.1, 4.0]`).
    pub scale_extent: [f64; 2],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            scale_extent: [0.1, 4.0],
        }
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [min, max] = self.scale_extent;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidScaleExtent { min, max });
        }
        Ok(())
    }
}

/// Everything needed to set up one diagram, as passed by a JS host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneOptions {
    /// Force preset name (default: `"base"`).
    pub preset: String,
    pub layout: LayoutOptions,
    pub simulation: SimulationConfig,
    pub viewport: ViewportConfig,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            preset: "base".to_string(),
            layout: LayoutOptions::default(),
            simulation: SimulationConfig::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_decay_reaches_min_in_300_ticks() {
        let config = SimulationConfig::default();
        let alpha = (1.0 - config.alpha_decay).powi(300);
        assert!((alpha - config.alpha_min).abs() < 1e-9);
    }

    #[test]
    fn test_simulation_validate() {
        assert!(SimulationConfig::default().validate().is_ok());

        let config = SimulationConfig {
            velocity_decay: 1.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSimulation {
                parameter: "velocity_decay",
                value: 1.5
            })
        );

        let config = SimulationConfig {
            alpha_decay: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Either would keep alpha above the threshold forever.
        for config in [
            SimulationConfig {
                alpha_decay: 0.0,
                ..Default::default()
            },
            SimulationConfig {
                alpha_min: 0.0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidSimulation { value, .. }) if value == 0.0
            ));
        }
    }

    #[test]
    fn test_dimensions_floor() {
        assert_eq!(Dimensions::clamped(0.0, -10.0), Dimensions::clamped(400.0, 400.0));
        assert_eq!(Dimensions::clamped(f64::NAN, 900.0).width, 400.0);
        let d = Dimensions::clamped(1200.0, 350.0);
        assert_eq!((d.width, d.height), (1200.0, 400.0));
        assert_eq!(d.center(), (600.0, 200.0));
    }

    #[test]
    fn test_viewport_validate() {
        assert!(ViewportConfig::default().validate().is_ok());
        for extent in [[0.0, 4.0], [2.0, 1.0], [0.1, f64::INFINITY]] {
            let config = ViewportConfig {
                scale_extent: extent,
            };
            assert!(config.validate().is_err(), "{extent:?}");
        }
    }

    #[test]
    fn test_partial_deserialize() {
        let map = serde::de::value::MapDeserializer::<_, serde::de::value::Error>::new(
            vec![("chargeStrength", -300.0), ("width", 1024.0)].into_iter(),
        );
        let options = LayoutOptions::deserialize(map).unwrap();
        assert_eq!(options.charge_strength, -300.0);
        assert_eq!(options.width, 1024.0);
        assert_eq!(options.link_distance, 40.0);
    }
}
