//! Drawing transformed accessory images onto a frame
//!
//! Each destination pixel center is mapped back into the accessory's local
//! rectangle, sampled bilinearly and blended source-over. Anything falling
//! outside the frame is clipped.

use glam::Vec2;
use image::{Pixel, Rgba, RgbaImage};

use super::placement::Placement;

/// Composite `image` onto `frame` at `placement`
pub fn draw_image(frame: &mut RgbaImage, image: &RgbaImage, placement: &Placement) {
    if !placement.is_drawable() || image.width() == 0 || image.height() == 0 {
        return;
    }

    let to_local = placement.transform().inverse();
    if !to_local.is_finite() {
        return;
    }

    let Some((x_range, y_range)) = clip_bounds(frame, placement) else {
        return;
    };

    let img_w = image.width() as f32;
    let img_h = image.height() as f32;

    for y in y_range {
        for x in x_range.clone() {
            let local = to_local.transform_point2(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            let uv = (local - placement.min) / placement.size;
            if uv.x < 0.0 || uv.y < 0.0 || uv.x >= 1.0 || uv.y >= 1.0 {
                continue;
            }

            let src = sample_bilinear(image, uv.x * img_w - 0.5, uv.y * img_h - 0.5);
            if src[3] == 0 {
                continue;
            }
            frame.get_pixel_mut(x, y).blend(&src);
        }
    }
}

/// Pixel ranges covered by the placement's bounding box, clipped to the frame
fn clip_bounds(
    frame: &RgbaImage,
    placement: &Placement,
) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
    let (lo, hi) = placement.bounds();
    let x0 = lo.x.floor().max(0.0);
    let y0 = lo.y.floor().max(0.0);
    let x1 = hi.x.ceil().min(frame.width() as f32);
    let y1 = hi.y.ceil().min(frame.height() as f32);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32..x1 as u32, y0 as u32..y1 as u32))
}

/// Bilinear sample at continuous pixel coordinates, clamped to the edges.
///
/// Interpolates in premultiplied alpha so transparent texels do not bleed
/// their color into opaque neighbours.
fn sample_bilinear(image: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let max_x = image.width() - 1;
    let max_y = image.height() - 1;
    let x = x.clamp(0.0, max_x as f32);
    let y = y.clamp(0.0, max_y as f32);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let taps = [
        (image.get_pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (image.get_pixel(x1, y0), fx * (1.0 - fy)),
        (image.get_pixel(x0, y1), (1.0 - fx) * fy),
        (image.get_pixel(x1, y1), fx * fy),
    ];

    let mut color = [0.0f32; 3];
    let mut alpha = 0.0f32;
    for (px, w) in taps {
        let a = px[3] as f32 * w;
        alpha += a;
        for (c, acc) in color.iter_mut().enumerate() {
            *acc += px[c] as f32 * a;
        }
    }

    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    Rgba([
        to_channel(color[0] / alpha),
        to_channel(color[1] / alpha),
        to_channel(color[2] / alpha),
        to_channel(alpha),
    ])
}

fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
