//! Configuration and serialization module.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TryOnError};

/// Frame size used when the source reports zero dimensions.
pub const FALLBACK_FRAME_WIDTH: u32 = 640;
pub const FALLBACK_FRAME_HEIGHT: u32 = 480;

/// Top-level try-on configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TryOnConfig {
    /// Accessory fit parameters.
    pub overlay: OverlayConfig,
    /// Filter parameters.
    pub filters: FilterConfig,
}

impl TryOnConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TryOnError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject multipliers and sizes that would produce degenerate placements.
    pub fn validate(&self) -> Result<()> {
        let o = &self.overlay;
        let checks = [
            ("overlay.glasses.scale_x", o.glasses.scale_x),
            ("overlay.glasses.scale_y", o.glasses.scale_y),
            ("overlay.hat.width_scale", o.hat.width_scale),
            ("overlay.hat.aspect", o.hat.aspect),
            ("overlay.earrings.size", o.earrings.size),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(TryOnError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let finite = [
            ("overlay.glasses.nose_pull", o.glasses.nose_pull),
            ("overlay.earrings.drop", o.earrings.drop),
            ("filters.edge_threshold", self.filters.edge_threshold),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(TryOnError::InvalidConfig(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Per-accessory fit parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub glasses: GlassesFit,
    pub hat: HatFit,
    pub earrings: EarringFit,
}

/// Glasses sizing relative to the eye-to-eye distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassesFit {
    /// Width multiplier.
    pub scale_x: f32,
    /// Height multiplier.
    pub scale_y: f32,
    /// Fraction of the eye-line to nose-bridge distance to shift by.
    pub nose_pull: f32,
}

impl Default for GlassesFit {
    fn default() -> Self {
        Self {
            scale_x: 1.4,
            scale_y: 0.55,
            nose_pull: 0.15,
        }
    }
}

/// Hat sizing relative to the temple-to-temple distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatFit {
    /// Hat width over temple distance.
    pub width_scale: f32,
    /// Hat height over hat width.
    pub aspect: f32,
}

impl Default for HatFit {
    fn default() -> Self {
        Self {
            width_scale: 1.18,
            aspect: 0.9,
        }
    }
}

/// Fixed earring geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarringFit {
    /// Side of the square drawn at each ear.
    pub size: f32,
    /// Distance below the ear anchor to the square's center.
    pub drop: f32,
}

impl Default for EarringFit {
    fn default() -> Self {
        Self {
            size: 40.0,
            drop: 25.0,
        }
    }
}

/// Filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Gradient magnitude above which the edge filter outputs white.
    pub edge_threshold: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fit_constants() {
        let config = TryOnConfig::default();
        assert_eq!(config.overlay.glasses.scale_x, 1.4);
        assert_eq!(config.overlay.glasses.scale_y, 0.55);
        assert_eq!(config.overlay.hat.aspect, 0.9);
        assert_eq!(config.overlay.earrings.size, 40.0);
        assert_eq!(config.filters.edge_threshold, 40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: TryOnConfig =
            serde_json::from_str(r#"{ "overlay": { "hat": { "aspect": 1.0 } } }"#).unwrap();
        assert_eq!(config.overlay.hat.aspect, 1.0);
        assert_eq!(config.overlay.hat.width_scale, 1.18);
        assert_eq!(config.overlay.glasses, GlassesFit::default());
    }

    #[test]
    fn test_validate_rejects_non_positive_scale() {
        let mut config = TryOnConfig::default();
        config.overlay.glasses.scale_x = 0.0;
        assert!(matches!(
            config.validate(),
            Err(TryOnError::InvalidConfig(_))
        ));

        let mut config = TryOnConfig::default();
        config.filters.edge_threshold = f32::NAN;
        assert!(config.validate().is_err());
    }
}
