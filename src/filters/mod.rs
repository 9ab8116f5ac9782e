//! Pixel filter pipeline
//!
//! Full-frame color filters applied after the accessory is composited.
//! Every filter works on the RGB channels in place and leaves alpha alone.

pub mod edge;
pub mod grayscale;
pub mod invert;
pub mod sepia;

pub use edge::EdgeDetect;
pub use grayscale::Grayscale;
pub use invert::Invert;
pub use sepia::Sepia;

use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;

/// A CPU filter that rewrites an RGBA frame in place
pub trait PixelFilter {
    /// Filter identifier
    fn name(&self) -> &'static str;

    /// Process the frame
    fn apply(&self, frame: &mut RgbaImage);
}

/// Selectable filter modes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Leave the frame untouched
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    /// Black/white gradient threshold
    Edge,
}

impl FilterMode {
    /// Get all available modes
    pub fn all() -> &'static [FilterMode] {
        &[
            FilterMode::None,
            FilterMode::Grayscale,
            FilterMode::Sepia,
            FilterMode::Invert,
            FilterMode::Edge,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterMode::None => "none",
            FilterMode::Grayscale => "grayscale",
            FilterMode::Sepia => "sepia",
            FilterMode::Invert => "invert",
            FilterMode::Edge => "edge",
        }
    }

    /// Get human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterMode::None => "No Filter",
            FilterMode::Grayscale => "Grayscale",
            FilterMode::Sepia => "Sepia",
            FilterMode::Invert => "Invert",
            FilterMode::Edge => "Edge Detect",
        }
    }

    /// Look up a mode by identifier. Unknown identifiers select `None`.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                log::warn!("Unknown filter '{}', using none", name);
                FilterMode::None
            })
    }

    /// The filter implementing this mode, or `None` for the no-op mode
    pub fn filter(&self, config: &FilterConfig) -> Option<Box<dyn PixelFilter>> {
        match self {
            FilterMode::None => None,
            FilterMode::Grayscale => Some(Box::new(Grayscale)),
            FilterMode::Sepia => Some(Box::new(Sepia)),
            FilterMode::Invert => Some(Box::new(Invert)),
            FilterMode::Edge => Some(Box::new(EdgeDetect::new(config.edge_threshold))),
        }
    }

    /// Run this mode's filter over `frame`
    pub fn apply(&self, frame: &mut RgbaImage, config: &FilterConfig) {
        if let Some(filter) = self.filter(config) {
            filter.apply(frame);
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Round and saturate a computed channel value
pub(crate) fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
