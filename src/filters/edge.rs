//! Edge detection filter
//!
//! Two passes: build a luminance image, then threshold the central
//! difference gradient of every interior pixel to pure black or white.
//! The one-pixel border keeps whatever the frame held before.

use image::{GrayImage, Luma, RgbaImage};

use super::{to_channel, PixelFilter};

/// Default gradient magnitude threshold
pub const DEFAULT_EDGE_THRESHOLD: f32 = 40.0;

pub struct EdgeDetect {
    threshold: f32,
}

impl EdgeDetect {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for EdgeDetect {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_THRESHOLD)
    }
}

/// Rec. 601 luma, rounded to 8 bits
pub fn luminance(frame: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let px = frame.get_pixel(x, y);
        Luma([to_channel(
            0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32,
        )])
    })
}

impl PixelFilter for EdgeDetect {
    fn name(&self) -> &'static str {
        "edge"
    }

    fn apply(&self, frame: &mut RgbaImage) {
        let (width, height) = frame.dimensions();
        if width < 3 || height < 3 {
            return;
        }

        let gray = luminance(frame);
        let at = |x: u32, y: u32| gray.get_pixel(x, y)[0] as f32;

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let gx = at(x - 1, y) - at(x + 1, y);
                let gy = at(x, y - 1) - at(x, y + 1);
                let value = if (gx * gx + gy * gy).sqrt() > self.threshold {
                    255
                } else {
                    0
                };
                let px = frame.get_pixel_mut(x, y);
                px[0] = value;
                px[1] = value;
                px[2] = value;
            }
        }
    }
}
