//! Invert filter

use image::RgbaImage;

use super::PixelFilter;

pub struct Invert;

impl PixelFilter for Invert {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn apply(&self, frame: &mut RgbaImage) {
        for px in frame.pixels_mut() {
            px[0] = 255 - px[0];
            px[1] = 255 - px[1];
            px[2] = 255 - px[2];
        }
    }
}
