//! Overlay placement engine
//!
//! Turns a face's landmarks into accessory placements and composites the
//! accessory image at each of them.

pub mod composite;
pub mod placement;

pub use composite::draw_image;
pub use placement::Placement;

use image::RgbaImage;

use crate::accessory::{Accessory, AccessoryKind};
use crate::config::OverlayConfig;
use crate::landmarks::{face_mesh, LandmarkSet};

/// Compute where `kind` goes on a `width` x `height` frame.
///
/// Returns `None` when the face lacks one of the required landmarks.
pub fn placements(
    face: &LandmarkSet,
    kind: AccessoryKind,
    width: u32,
    height: u32,
    config: &OverlayConfig,
) -> Option<Vec<Placement>> {
    let anchor = |index| face.anchor(index, width, height);

    let placed = match kind {
        AccessoryKind::Glasses => vec![placement::glasses(
            anchor(face_mesh::LEFT_EYE)?,
            anchor(face_mesh::RIGHT_EYE)?,
            anchor(face_mesh::NOSE_BRIDGE)?,
            &config.glasses,
        )],
        AccessoryKind::Hat => vec![placement::hat(
            anchor(face_mesh::FOREHEAD)?,
            anchor(face_mesh::LEFT_TEMPLE)?,
            anchor(face_mesh::RIGHT_TEMPLE)?,
            &config.hat,
        )],
        AccessoryKind::Ear => placement::earrings(
            anchor(face_mesh::LEFT_EAR)?,
            anchor(face_mesh::RIGHT_EAR)?,
            &config.earrings,
        )
        .to_vec(),
    };

    Some(placed)
}

/// Draw `accessory` on `frame` for the given face.
///
/// Returns the number of copies drawn; zero means the frame was left as is.
pub fn draw_accessory(
    frame: &mut RgbaImage,
    face: &LandmarkSet,
    accessory: &Accessory,
    config: &OverlayConfig,
) -> usize {
    let (width, height) = frame.dimensions();
    let Some(placed) = placements(face, accessory.kind, width, height, config) else {
        log::warn!(
            "Face has {} landmarks, too few to place {} '{}'",
            face.len(),
            accessory.kind,
            accessory.id
        );
        return 0;
    };

    let mut drawn = 0;
    for p in &placed {
        if !p.is_drawable() {
            log::debug!("Skipping degenerate placement for '{}': {:?}", accessory.id, p);
            continue;
        }
        draw_image(frame, &accessory.image, p);
        drawn += 1;
    }
    drawn
}
