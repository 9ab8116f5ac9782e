//! Per-frame rendering
//!
//! [`render`] is the pure core: source frame in, composited and filtered
//! frame out. [`RenderContext`] wraps it with the state a live session
//! carries between frames (current selections and a reusable buffer).

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::accessory::{Accessory, AccessoryCatalog};
use crate::config::{TryOnConfig, FALLBACK_FRAME_HEIGHT, FALLBACK_FRAME_WIDTH};
use crate::error::{Result, TryOnError};
use crate::filters::FilterMode;
use crate::landmarks::{Detection, LandmarkSet};
use crate::overlay;

/// Default file name for exported snapshots
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.png";

/// Render one frame.
///
/// Copies `source`, draws `accessory` for `face` when both are present,
/// then applies `filter`. Without a face or accessory the output is the
/// source with only the filter applied.
pub fn render(
    source: &RgbaImage,
    face: Option<&LandmarkSet>,
    accessory: Option<&Accessory>,
    filter: FilterMode,
    config: &TryOnConfig,
) -> RgbaImage {
    let mut frame = source.clone();
    compose_into(&mut frame, face, accessory, filter, config);
    frame
}

/// Overlay and filter stages, run on a frame already holding the source
fn compose_into(
    frame: &mut RgbaImage,
    face: Option<&LandmarkSet>,
    accessory: Option<&Accessory>,
    filter: FilterMode,
    config: &TryOnConfig,
) {
    if let (Some(face), Some(accessory)) = (face, accessory) {
        let drawn = overlay::draw_accessory(frame, face, accessory, &config.overlay);
        log::trace!("Drew {} copies of '{}'", drawn, accessory.id);
    }
    filter.apply(frame, &config.filters);
}

/// Selection state and output buffer for a sequence of frames
pub struct RenderContext {
    catalog: AccessoryCatalog,
    config: TryOnConfig,
    /// Index into the catalog of the selected accessory
    selected: Option<usize>,
    filter: FilterMode,
    frame: RgbaImage,
    frame_count: u64,
}

impl RenderContext {
    /// Create a context selecting the catalog's first accessory and no filter
    pub fn new(catalog: AccessoryCatalog, config: TryOnConfig) -> Self {
        let selected = if catalog.is_empty() { None } else { Some(0) };
        Self {
            catalog,
            config,
            selected,
            filter: FilterMode::None,
            frame: RgbaImage::new(FALLBACK_FRAME_WIDTH, FALLBACK_FRAME_HEIGHT),
            frame_count: 0,
        }
    }

    pub fn catalog(&self) -> &AccessoryCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &TryOnConfig {
        &self.config
    }

    /// Currently selected accessory
    pub fn accessory(&self) -> Option<&Accessory> {
        self.selected.and_then(|i| self.catalog.iter().nth(i))
    }

    /// Select an accessory by id.
    ///
    /// Returns false and keeps the current selection when the id is unknown.
    pub fn select_accessory(&mut self, id: &str) -> bool {
        match self.catalog.iter().position(|a| a.id == id) {
            Some(index) => {
                self.selected = Some(index);
                log::info!("Selected accessory '{}'", id);
                true
            }
            None => {
                log::warn!("Unknown accessory '{}', keeping current selection", id);
                false
            }
        }
    }

    /// Render frames without any accessory
    pub fn clear_accessory(&mut self) {
        self.selected = None;
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        if self.filter != filter {
            log::info!("Filter: {} -> {}", self.filter, filter);
        }
        self.filter = filter;
    }

    /// Select a filter by identifier; unknown names select no filter
    pub fn set_filter_by_name(&mut self, name: &str) {
        self.set_filter(FilterMode::parse(name));
    }

    /// The most recently rendered frame
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Number of frames rendered since creation
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Render `source` with the current selections into the context's buffer.
    ///
    /// The buffer follows the source's dimensions; a zero-sized source
    /// yields a blank frame of the fallback size.
    pub fn render_frame(&mut self, source: &RgbaImage, detection: &Detection) -> &RgbaImage {
        let (width, height) = source.dimensions();

        if width == 0 || height == 0 {
            log::warn!("Source frame has no pixels, using {}x{}", FALLBACK_FRAME_WIDTH, FALLBACK_FRAME_HEIGHT);
            self.resize(FALLBACK_FRAME_WIDTH, FALLBACK_FRAME_HEIGHT);
            self.clear();
        } else {
            self.resize(width, height);
            self.frame.copy_from_slice(&source.as_raw()[..width as usize * height as usize * 4]);
        }

        let accessory = self.selected.and_then(|i| self.catalog.iter().nth(i));
        compose_into(
            &mut self.frame,
            detection.primary(),
            accessory,
            self.filter,
            &self.config,
        );

        self.frame_count += 1;
        &self.frame
    }

    /// Clear the output frame to transparent
    pub fn reset(&mut self) {
        self.clear();
        log::info!("Render context reset");
    }

    /// Encode the current frame as PNG
    pub fn snapshot_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.frame
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write the current frame as a PNG file
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.snapshot_png()?;
        std::fs::write(path, bytes).map_err(|e| TryOnError::io(path, e))?;
        log::info!("Saved snapshot to {:?}", path);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.frame.dimensions() != (width, height) {
            log::debug!(
                "Resizing frame buffer {:?} -> {}x{}",
                self.frame.dimensions(),
                width,
                height
            );
            self.frame = RgbaImage::new(width, height);
        }
    }

    fn clear(&mut self) {
        for px in self.frame.pixels_mut() {
            px.0 = [0; 4];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::AccessoryKind;
    use crate::landmarks::{face_mesh, Landmark};
    use image::Rgba;

    const SKIN: Rgba<u8> = Rgba([200, 160, 140, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn catalog() -> AccessoryCatalog {
        AccessoryCatalog::from_accessories(vec![
            Accessory::new("studs", "Studs", AccessoryKind::Ear, RgbaImage::from_pixel(4, 4, RED)),
            Accessory::new("cap", "Cap", AccessoryKind::Hat, RgbaImage::from_pixel(4, 4, RED)),
        ])
        .unwrap()
    }

    fn face() -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); face_mesh::REFINED_LANDMARK_COUNT];
        points[face_mesh::LEFT_EAR] = Landmark::new(0.25, 0.25);
        points[face_mesh::RIGHT_EAR] = Landmark::new(0.75, 0.25);
        points[face_mesh::LEFT_TEMPLE] = Landmark::new(0.3, 0.5);
        points[face_mesh::RIGHT_TEMPLE] = Landmark::new(0.7, 0.5);
        points[face_mesh::FOREHEAD] = Landmark::new(0.5, 0.6);
        LandmarkSet::new(points)
    }

    #[test]
    fn test_context_defaults_to_first_accessory() {
        let ctx = RenderContext::new(catalog(), TryOnConfig::default());
        assert_eq!(ctx.accessory().unwrap().id, "studs");
        assert_eq!(ctx.filter(), FilterMode::None);
    }

    #[test]
    fn test_unknown_selection_keeps_current() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        assert!(ctx.select_accessory("cap"));
        assert!(!ctx.select_accessory("tiara"));
        assert_eq!(ctx.accessory().unwrap().id, "cap");

        ctx.set_filter_by_name("posterize");
        assert_eq!(ctx.filter(), FilterMode::None);
    }

    #[test]
    fn test_render_frame_tracks_source_size() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        let source = RgbaImage::from_pixel(160, 120, SKIN);
        let out = ctx.render_frame(&source, &Detection::none());
        assert_eq!(out.dimensions(), (160, 120));
        assert_eq!(out, &source);

        let source = RgbaImage::from_pixel(80, 60, SKIN);
        assert_eq!(ctx.render_frame(&source, &Detection::none()).dimensions(), (80, 60));
        assert_eq!(ctx.frame_count(), 2);
    }

    #[test]
    fn test_zero_sized_source_falls_back() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        let out = ctx.render_frame(&RgbaImage::new(0, 0), &Detection::single(face()));
        assert_eq!(out.dimensions(), (FALLBACK_FRAME_WIDTH, FALLBACK_FRAME_HEIGHT));
    }

    #[test]
    fn test_earrings_drawn_with_face() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        let source = RgbaImage::from_pixel(200, 200, SKIN);
        let out = ctx.render_frame(&source, &Detection::single(face()));
        // Left ear at (50, 50); square centered at (50, 75)
        assert_eq!(*out.get_pixel(50, 75), RED);
        assert_eq!(*out.get_pixel(150, 75), RED);
        assert_eq!(*out.get_pixel(100, 75), SKIN);
    }

    #[test]
    fn test_cleared_accessory_is_passthrough() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        ctx.clear_accessory();
        let source = RgbaImage::from_pixel(64, 64, SKIN);
        assert_eq!(ctx.render_frame(&source, &Detection::single(face())), &source);
    }

    #[test]
    fn test_source_with_oversized_container() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        let source = RgbaImage::from_raw(2, 2, vec![7u8; 20]).unwrap();
        let out = ctx.render_frame(&source, &Detection::none());
        assert_eq!(out.dimensions(), (2, 2));
        assert!(out.pixels().all(|p| p.0 == [7; 4]));
    }

    #[test]
    fn test_reset_clears_frame() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        ctx.render_frame(&RgbaImage::from_pixel(10, 10, SKIN), &Detection::none());
        ctx.reset();
        assert!(ctx.frame().pixels().all(|p| p.0 == [0, 0, 0, 0]));
        assert_eq!(ctx.frame().dimensions(), (10, 10));
    }

    #[test]
    fn test_snapshot_round_trips_through_png() {
        let mut ctx = RenderContext::new(catalog(), TryOnConfig::default());
        ctx.set_filter(FilterMode::Invert);
        ctx.render_frame(&RgbaImage::from_pixel(6, 4, SKIN), &Detection::none());
        let png = ctx.snapshot_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(&decoded, ctx.frame());
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([55, 95, 115, 255]));
    }
}
