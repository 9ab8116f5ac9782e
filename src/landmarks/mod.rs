//! Face landmark input
//!
//! Landmarks arrive from an external Face Mesh detector as normalized
//! coordinates. Anchors are the same points scaled to frame pixels.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TryOnError};

/// Face Mesh landmark indices used for accessory anchors.
pub mod face_mesh {
    /// Left eye, outer corner
    pub const LEFT_EYE: usize = 33;
    /// Right eye, outer corner
    pub const RIGHT_EYE: usize = 263;
    /// Nose bridge between the eyes
    pub const NOSE_BRIDGE: usize = 168;
    /// Left temple
    pub const LEFT_TEMPLE: usize = 127;
    /// Right temple
    pub const RIGHT_TEMPLE: usize = 356;
    /// Top of the forehead
    pub const FOREHEAD: usize = 10;
    /// Left ear (tragion)
    pub const LEFT_EAR: usize = 234;
    /// Right ear (tragion)
    pub const RIGHT_EAR: usize = 454;

    /// Landmark count produced with iris refinement enabled.
    pub const REFINED_LANDMARK_COUNT: usize = 478;
}

/// Face landmark (normalized coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Landmarks for one detected face, indexed by Face Mesh index
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Landmark `index` in pixel coordinates of a `width` x `height` frame
    pub fn anchor(&self, index: usize, width: u32, height: u32) -> Option<Vec2> {
        self.points
            .get(index)
            .map(|p| Vec2::new(p.x * width as f32, p.y * height as f32))
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

/// Detector output for a single frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    /// Detected faces; only the first one is rendered
    pub faces: Vec<LandmarkSet>,
}

/// Accepted JSON shapes for a detection
#[derive(Deserialize)]
#[serde(untagged)]
enum DetectionRepr {
    Faces(Vec<LandmarkSet>),
    Face(LandmarkSet),
    Results(ResultsRepr),
}

/// Detector results object; `multiFaceLandmarks` is required and `null`
/// means no face
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResultsRepr {
    #[serde(rename = "multiFaceLandmarks", deserialize_with = "Option::deserialize")]
    multi_face_landmarks: Option<Vec<LandmarkSet>>,
}

impl Detection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(face: LandmarkSet) -> Self {
        Self { faces: vec![face] }
    }

    /// The face used for rendering
    pub fn primary(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }

    /// Parse a detection from JSON.
    ///
    /// Accepts a single face (`[{x, y, z}, ...]`), a list of faces, or a
    /// results object with a `multiFaceLandmarks` field.
    pub fn from_json(text: &str) -> Result<Self> {
        let faces = match serde_json::from_str::<DetectionRepr>(text)? {
            DetectionRepr::Faces(faces) => faces,
            DetectionRepr::Face(face) => vec![face],
            DetectionRepr::Results(results) => results.multi_face_landmarks.unwrap_or_default(),
        };
        Ok(Self { faces })
    }

    /// Read a detection from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TryOnError::io(path, e))?;
        Self::from_json(&text)
    }
}
