//! Ordered, identifier-unique collection of color profiles

use crate::color::profile::ColorProfile;
use crate::io::error::{MosaicError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Catalog of source image colors
///
/// Entry order is construction order; the spatial index uses it to break
/// distance ties. Identifiers are file names resolved against `image_root`.
/// There is no mutation API, so an index built from a catalog stays valid.
#[derive(Debug, Clone)]
pub struct ColorCatalog {
    entries: Vec<ColorProfile>,
    image_root: PathBuf,
}

impl ColorCatalog {
    /// Build a catalog from profiles in insertion order
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if two profiles share an identifier
    pub fn from_profiles(
        profiles: Vec<ColorProfile>,
        image_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        {
            let mut seen = HashSet::with_capacity(profiles.len());
            if let Some(duplicate) = profiles
                .iter()
                .find(|profile| !seen.insert(profile.identifier.as_str()))
            {
                return Err(MosaicError::DuplicateIdentifier {
                    identifier: duplicate.identifier.clone(),
                });
            }
        }

        Ok(Self {
            entries: profiles,
            image_root: image_root.into(),
        })
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ColorProfile] {
        &self.entries
    }

    /// Entry at an insertion index
    pub fn get(&self, index: usize) -> Option<&ColorProfile> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory that identifiers resolve against
    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    /// Full path of the source image behind an entry
    pub fn resolve(&self, profile: &ColorProfile) -> PathBuf {
        self.image_root.join(&profile.identifier)
    }
}
