//! Dataset directory layout: `<root>/images/*` and `<root>/analysis/<catalog>`

use crate::catalog::format::{read_catalog_with_root, write_catalog};
use crate::catalog::store::ColorCatalog;
use crate::color::profiler::{ColorProfiler, ProfilingReport, list_source_images};
use crate::io::configuration::{ANALYSIS_DIR, CATALOG_FILE_NAME, IMAGES_DIR};
use crate::io::error::{MosaicError, Result};
use indicatif::ProgressBar;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::path::{Path, PathBuf};

/// Paths within one dataset root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Dataset root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of source images
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    /// Directory of derived analysis files
    pub fn analysis_dir(&self) -> PathBuf {
        self.root.join(ANALYSIS_DIR)
    }

    /// Path of the persisted color catalog
    pub fn catalog_path(&self) -> PathBuf {
        self.analysis_dir().join(CATALOG_FILE_NAME)
    }

    /// Whether a catalog has been written for this dataset
    pub fn has_catalog(&self) -> bool {
        self.catalog_path().is_file()
    }

    /// Profile the source images and persist the catalog
    ///
    /// # Errors
    ///
    /// Returns a file system error if `images/` is missing or the catalog
    /// cannot be written
    pub fn analyze(&self, profiler: &ColorProfiler, progress: &ProgressBar) -> Result<ProfilingReport> {
        let images_dir = self.images_dir();
        if !images_dir.is_dir() {
            return Err(MosaicError::FileSystem {
                path: images_dir,
                operation: "open dataset images",
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let report = profiler.profile_directory(&images_dir, progress)?;
        let catalog_path = self.catalog_path();
        write_catalog(&report.catalog, &catalog_path)?;
        tracing::info!(path = %catalog_path.display(), "catalog written");
        Ok(report)
    }

    /// Load the persisted catalog, resolving against `images/`
    ///
    /// # Errors
    ///
    /// Returns a file system or format error from reading the catalog
    pub fn load_catalog(&self) -> Result<ColorCatalog> {
        read_catalog_with_root(&self.catalog_path(), self.images_dir())
    }

    /// Pick a random source image, e.g. as a default target
    ///
    /// # Errors
    ///
    /// Returns a file system error if `images/` cannot be listed or holds
    /// no source images
    pub fn random_image(&self, rng: &mut impl Rng) -> Result<PathBuf> {
        let images_dir = self.images_dir();
        let images = list_source_images(&images_dir)?;
        images
            .choose(rng)
            .cloned()
            .ok_or_else(|| MosaicError::FileSystem {
                path: images_dir,
                operation: "choose random image",
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no source images in dataset",
                ),
            })
    }
}
