//! Accessory catalog
//!
//! Accessories are listed in a JSON manifest (`id`, `label`, `src`, `type`)
//! and their images decoded once at load time.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TryOnError};

/// Accessory types, each with its own placement rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessoryKind {
    /// Anchored on the eyes
    Glasses,
    /// Anchored on the forehead and temples
    Hat,
    /// One copy per ear
    #[serde(alias = "earring", alias = "earrings")]
    Ear,
}

impl AccessoryKind {
    pub fn name(&self) -> &'static str {
        match self {
            AccessoryKind::Glasses => "glasses",
            AccessoryKind::Hat => "hat",
            AccessoryKind::Ear => "ear",
        }
    }
}

impl fmt::Display for AccessoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One manifest entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub label: String,
    /// Image path, relative to the manifest's directory
    pub src: PathBuf,
    #[serde(rename = "type")]
    pub kind: AccessoryKind,
}

/// A selectable accessory with its decoded image
#[derive(Clone)]
pub struct Accessory {
    pub id: String,
    pub label: String,
    pub kind: AccessoryKind,
    pub image: RgbaImage,
}

impl Accessory {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: AccessoryKind,
        image: RgbaImage,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            image,
        }
    }
}

impl fmt::Debug for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessory")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("size", &self.image.dimensions())
            .finish()
    }
}

/// Ordered set of accessories; the first entry is the default selection
#[derive(Clone, Debug, Default)]
pub struct AccessoryCatalog {
    accessories: Vec<Accessory>,
}

impl AccessoryCatalog {
    /// Build a catalog from already-decoded accessories
    pub fn from_accessories(accessories: Vec<Accessory>) -> Result<Self> {
        let mut seen = HashSet::new();
        for accessory in &accessories {
            if !seen.insert(accessory.id.as_str()) {
                return Err(TryOnError::DuplicateAccessory(accessory.id.clone()));
            }
        }
        Ok(Self { accessories })
    }

    /// Load a manifest and decode every image it lists
    pub fn load(manifest_path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = manifest_path.as_ref();
        let text = std::fs::read_to_string(manifest_path)
            .map_err(|e| TryOnError::io(manifest_path, e))?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&text)?;
        if entries.is_empty() {
            return Err(TryOnError::EmptyCatalog(manifest_path.to_path_buf()));
        }

        let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let mut accessories = Vec::with_capacity(entries.len());
        for entry in entries {
            let image_path = base_dir.join(&entry.src);
            let image = image::open(&image_path)
                .map_err(|e| match e {
                    image::ImageError::IoError(e) => TryOnError::io(&image_path, e),
                    e => TryOnError::Image(e),
                })?
                .to_rgba8();
            log::debug!(
                "Loaded accessory '{}' ({}) from {:?}: {}x{}",
                entry.id,
                entry.kind,
                image_path,
                image.width(),
                image.height()
            );
            accessories.push(Accessory {
                id: entry.id,
                label: entry.label,
                kind: entry.kind,
                image,
            });
        }

        let catalog = Self::from_accessories(accessories)?;
        log::info!(
            "Loaded {} accessories from {:?}",
            catalog.len(),
            manifest_path
        );
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Accessory> {
        self.accessories.iter().find(|a| a.id == id)
    }

    pub fn first(&self) -> Option<&Accessory> {
        self.accessories.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Accessory> {
        self.accessories.iter()
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }
}
