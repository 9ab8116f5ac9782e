//! Sepia filter
//!
//! Classic sepia tone matrix; results saturate at 255.

use image::RgbaImage;

use super::{to_channel, PixelFilter};

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

pub struct Sepia;

impl PixelFilter for Sepia {
    fn name(&self) -> &'static str {
        "sepia"
    }

    fn apply(&self, frame: &mut RgbaImage) {
        for px in frame.pixels_mut() {
            let rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
            for (c, row) in SEPIA.iter().enumerate() {
                px[c] = to_channel(row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]);
            }
        }
    }
}
