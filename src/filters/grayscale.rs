//! Grayscale filter
//!
//! Replaces each RGB channel with the plain channel average.

use image::RgbaImage;

use super::{to_channel, PixelFilter};

pub struct Grayscale;

impl PixelFilter for Grayscale {
    fn name(&self) -> &'static str {
        "grayscale"
    }

    fn apply(&self, frame: &mut RgbaImage) {
        for px in frame.pixels_mut() {
            let [r, g, b, _] = px.0;
            let avg = to_channel((r as f32 + g as f32 + b as f32) / 3.0);
            px[0] = avg;
            px[1] = avg;
            px[2] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_channels_equal_rounded_average() {
        let mut frame = RgbaImage::from_fn(16, 16, |x, y| {
            Rgba([(x * 16) as u8, (y * 16) as u8, ((x * y) % 256) as u8, 200])
        });
        let original = frame.clone();
        Grayscale.apply(&mut frame);

        for (px, orig) in frame.pixels().zip(original.pixels()) {
            let avg = (orig[0] as f32 + orig[1] as f32 + orig[2] as f32) / 3.0;
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[0], avg.round() as u8);
            assert_eq!(px[3], 200);
        }
    }

    #[test]
    fn test_known_values() {
        let mut frame = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 31, 9]));
        Grayscale.apply(&mut frame);
        assert_eq!(*frame.get_pixel(0, 0), Rgba([20, 20, 20, 9]));
    }
}
