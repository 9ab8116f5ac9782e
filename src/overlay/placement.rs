//! Accessory placement geometry
//!
//! Every rule measures a baseline between two anchors, takes its slope as
//! the rotation and its length as the scale, then positions a rectangle in
//! the rotated frame around a pivot.

use glam::{Affine2, Vec2};

use crate::config::{EarringFit, GlassesFit, HatFit};

/// Where and how one copy of an accessory image is drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Rotation pivot in frame pixels
    pub pivot: Vec2,
    /// Rotation about the pivot, radians
    pub rotation: f32,
    /// Top-left of the destination rectangle, relative to the pivot before rotation
    pub min: Vec2,
    /// Destination rectangle size in pixels
    pub size: Vec2,
}

impl Placement {
    /// Local rectangle coordinates to frame pixels
    pub fn transform(&self) -> Affine2 {
        Affine2::from_angle_translation(self.rotation, self.pivot)
    }

    /// Center of the destination rectangle in frame pixels
    pub fn center(&self) -> Vec2 {
        self.transform()
            .transform_point2(self.min + self.size * 0.5)
    }

    /// Rectangle corners in frame pixels: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        let t = self.transform();
        let max = self.min + self.size;
        [
            t.transform_point2(self.min),
            t.transform_point2(Vec2::new(max.x, self.min.y)),
            t.transform_point2(max),
            t.transform_point2(Vec2::new(self.min.x, max.y)),
        ]
    }

    /// Axis-aligned bounding box in frame pixels as `(min, max)`
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let corners = self.corners();
        let mut lo = corners[0];
        let mut hi = corners[0];
        for c in &corners[1..] {
            lo = lo.min(*c);
            hi = hi.max(*c);
        }
        (lo, hi)
    }

    /// False for non-finite or empty rectangles
    pub fn is_drawable(&self) -> bool {
        self.pivot.is_finite()
            && self.rotation.is_finite()
            && self.min.is_finite()
            && self.size.is_finite()
            && self.size.x > 0.0
            && self.size.y > 0.0
    }
}

/// Baseline length and slope angle from `from` to `to`
fn baseline(from: Vec2, to: Vec2) -> (f32, f32) {
    let d = to - from;
    (d.length(), d.y.atan2(d.x))
}

/// Glasses spanning the eyes, nudged toward the nose bridge
pub fn glasses(left_eye: Vec2, right_eye: Vec2, nose_bridge: Vec2, fit: &GlassesFit) -> Placement {
    let (dist, angle) = baseline(left_eye, right_eye);
    let center = (left_eye + right_eye) * 0.5;
    let size = Vec2::new(dist * fit.scale_x, dist * fit.scale_y);
    let offset_y = (nose_bridge.y - center.y) * fit.nose_pull;

    Placement {
        pivot: center,
        rotation: angle,
        min: Vec2::new(-size.x / 2.0, -size.y / 2.0 + offset_y),
        size,
    }
}

/// Hat standing on the forehead, sized by the temples
pub fn hat(forehead: Vec2, left_temple: Vec2, right_temple: Vec2, fit: &HatFit) -> Placement {
    let (base_width, angle) = baseline(left_temple, right_temple);
    let width = base_width * fit.width_scale;
    let height = width * fit.aspect;

    Placement {
        pivot: Vec2::new((left_temple.x + right_temple.x) / 2.0, forehead.y),
        rotation: angle,
        min: Vec2::new(-width / 2.0, -height),
        size: Vec2::new(width, height),
    }
}

/// One fixed-size, unrotated square hanging below each ear
pub fn earrings(left_ear: Vec2, right_ear: Vec2, fit: &EarringFit) -> [Placement; 2] {
    let hang = |ear: Vec2| Placement {
        pivot: Vec2::new(ear.x, ear.y + fit.drop),
        rotation: 0.0,
        min: Vec2::splat(-fit.size / 2.0),
        size: Vec2::splat(fit.size),
    };
    [hang(left_ear), hang(right_ear)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_glasses_level_eyes() {
        let p = glasses(
            Vec2::new(100.0, 200.0),
            Vec2::new(200.0, 200.0),
            Vec2::new(150.0, 240.0),
            &GlassesFit::default(),
        );
        assert_eq!(p.rotation, 0.0);
        assert!((p.size.x - 140.0).abs() < EPS);
        assert!((p.size.y - 55.0).abs() < EPS);
        // 0.15 * (240 - 200) = 6 px down from the eye line
        assert!(approx(p.center(), Vec2::new(150.0, 206.0)));
    }

    #[test]
    fn test_glasses_rotation_follows_eye_slope() {
        let left = Vec2::new(100.0, 100.0);
        let right = Vec2::new(180.0, 160.0);
        let p = glasses(left, right, Vec2::new(140.0, 130.0), &GlassesFit::default());
        assert!((p.rotation - 60.0f32.atan2(80.0)).abs() < EPS);
        assert!((p.size.x - 100.0 * 1.4).abs() < EPS);
        // Nose bridge at the midpoint: no offset, centered between the eyes
        assert!(approx(p.center(), Vec2::new(140.0, 130.0)));
    }

    #[test]
    fn test_glasses_offset_is_along_local_vertical() {
        let left = Vec2::new(0.0, 0.0);
        let right = Vec2::new(0.0, 100.0);
        let p = glasses(left, right, Vec2::new(0.0, 150.0), &GlassesFit::default());
        // Rotated a quarter turn, local "down" points toward -x
        let expected_offset = (150.0 - 50.0) * 0.15;
        assert!(approx(p.center(), Vec2::new(-expected_offset, 50.0)));
    }

    #[test]
    fn test_hat_sits_on_forehead() {
        let p = hat(
            Vec2::new(160.0, 120.0),
            Vec2::new(100.0, 180.0),
            Vec2::new(200.0, 180.0),
            &HatFit::default(),
        );
        let (lo, hi) = p.bounds();
        assert!((hi.y - 120.0).abs() < EPS);
        assert!((p.size.x - 118.0).abs() < EPS);
        assert_eq!(p.size.y, p.size.x * 0.9);
        assert!((lo.y - (120.0 - p.size.y)).abs() < EPS);
        // Centered on the temples, not the forehead x
        assert!(((lo.x + hi.x) / 2.0 - 150.0).abs() < EPS);
    }

    #[test]
    fn test_hat_rotates_about_forehead_pivot() {
        let p = hat(
            Vec2::new(150.0, 100.0),
            Vec2::new(100.0, 150.0),
            Vec2::new(200.0, 170.0),
            &HatFit::default(),
        );
        assert_eq!(p.pivot, Vec2::new(150.0, 100.0));
        assert!((p.rotation - 20.0f32.atan2(100.0)).abs() < EPS);
        // Bottom edge midpoint stays on the pivot
        let corners = p.corners();
        assert!(approx((corners[2] + corners[3]) * 0.5, p.pivot));
    }

    #[test]
    fn test_earrings_hang_below_each_ear() {
        let [l, r] = earrings(
            Vec2::new(50.0, 300.0),
            Vec2::new(400.0, 310.0),
            &EarringFit::default(),
        );
        assert_eq!(l.size, r.size);
        assert_eq!(l.size, Vec2::splat(40.0));
        assert_eq!(l.rotation, 0.0);
        assert!(approx(l.center(), Vec2::new(50.0, 325.0)));
        assert!(approx(r.center(), Vec2::new(400.0, 335.0)));
    }

    #[test]
    fn test_coincident_eyes_are_not_drawable() {
        let eye = Vec2::new(10.0, 10.0);
        let p = glasses(eye, eye, eye, &GlassesFit::default());
        assert!(!p.is_drawable());
    }
}
