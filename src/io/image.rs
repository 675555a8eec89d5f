//! Mosaic export, format chosen by file extension

use crate::io::error::{MosaicError, Result, file_system};
use crate::render::compositor::Mosaic;
use std::path::Path;

/// Save a finished mosaic, creating parent directories
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The extension names no supported format
/// - The image cannot be encoded or written
pub fn export_mosaic(mosaic: &Mosaic, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(file_system(parent, "create directory"))?;
    }

    mosaic
        .pixel_buffer
        .save(output_path)
        .map_err(|e| MosaicError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    tracing::info!(path = %output_path.display(), "mosaic saved");
    Ok(())
}
