//! Face Try-On - landmark-driven accessory overlays
//!
//! Takes a video frame and the face landmarks detected on it, composites the
//! selected accessory (glasses, hat, earrings) at a pose derived from the
//! landmarks, then runs an optional full-frame color filter.
//!
//! Camera capture and landmark detection live outside this crate; callers
//! invoke [`render`] (or [`RenderContext::render_frame`]) once per frame.

pub mod accessory;
pub mod config;
pub mod error;
pub mod filters;
pub mod landmarks;
pub mod overlay;
pub mod render;

pub use accessory::{Accessory, AccessoryCatalog, AccessoryKind};
pub use config::TryOnConfig;
pub use error::{Result, TryOnError};
pub use filters::FilterMode;
pub use landmarks::{Detection, Landmark, LandmarkSet};
pub use render::{render, RenderContext};
