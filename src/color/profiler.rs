//! Parallel color profiling of a source image directory

use crate::catalog::store::ColorCatalog;
use crate::color::profile::ColorProfile;
use crate::io::configuration::SOURCE_EXTENSIONS;
use crate::io::decode::DecoderChain;
use crate::io::error::{DecodeError, DecodeErrorKind, Result, file_system};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Outcome of profiling a directory
#[derive(Debug)]
pub struct ProfilingReport {
    /// One entry per successfully decoded image
    pub catalog: ColorCatalog,
    /// Images that could not be decoded, in listing order
    pub skipped: Vec<DecodeError>,
}

/// Profiles every source image in a directory on the rayon pool
pub struct ColorProfiler {
    decoders: DecoderChain,
}

impl Default for ColorProfiler {
    fn default() -> Self {
        Self::new(DecoderChain::default())
    }
}

impl ColorProfiler {
    /// Profiler using the given decoder chain
    pub const fn new(decoders: DecoderChain) -> Self {
        Self { decoders }
    }

    /// Profile a single image file
    ///
    /// # Errors
    ///
    /// Returns a decode error if the file cannot be read or decoded
    pub fn profile_file(&self, path: &Path) -> std::result::Result<ColorProfile, DecodeError> {
        let identifier = catalog_identifier(path).ok_or_else(|| {
            DecodeError::new(
                path,
                DecodeErrorKind::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file name cannot be stored in the catalog",
                )),
            )
        })?;
        let image = self.decoders.decode_file(path)?;
        Ok(ColorProfile::of_image(identifier, &image))
    }

    /// Profile every source image in `images_dir`
    ///
    /// Files are listed in sorted order and results are gathered in that
    /// order, so the catalog is identical across runs. Undecodable files are
    /// reported in `skipped` and omitted from the catalog.
    ///
    /// # Errors
    ///
    /// Returns a file system error if the directory cannot be listed
    pub fn profile_directory(
        &self,
        images_dir: &Path,
        progress: &ProgressBar,
    ) -> Result<ProfilingReport> {
        let files = list_source_images(images_dir)?;
        tracing::info!(
            count = files.len(),
            dir = %images_dir.display(),
            "profiling source images"
        );

        progress.set_length(files.len() as u64);
        progress.set_position(0);
        progress.set_message("profiling");

        let outcomes: Vec<_> = files
            .par_iter()
            .map(|path| {
                let outcome = self.profile_file(path);
                progress.inc(1);
                outcome
            })
            .collect();

        let mut profiles = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(profile) => profiles.push(profile),
                Err(error) => {
                    tracing::warn!(%error, "skipping undecodable image");
                    skipped.push(error);
                }
            }
        }

        tracing::info!(
            profiled = profiles.len(),
            skipped = skipped.len(),
            "profiling complete"
        );

        Ok(ProfilingReport {
            catalog: ColorCatalog::from_profiles(profiles, images_dir)?,
            skipped,
        })
    }
}

/// Sorted paths of files in `dir` with a source image extension
///
/// Files whose names cannot serve as catalog identifiers (not UTF-8, or
/// containing a line break) are skipped with a warning.
///
/// # Errors
///
/// Returns a file system error if the directory cannot be read
pub fn list_source_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(file_system(dir, "read directory"))? {
        let path = entry.map_err(file_system(dir, "read directory entry"))?.path();
        if !path.is_file() || !has_source_extension(&path) {
            continue;
        }
        if catalog_identifier(&path).is_none() {
            tracing::warn!(path = %path.display(), "skipping image whose name cannot be cataloged");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Whether the path has one of the accepted source extensions
pub fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// File name of `path` if it can be stored in and resolved from the catalog
pub fn catalog_identifier(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.contains(['\n', '\r']))
}
