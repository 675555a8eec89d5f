//! Catalog file reader and writer
//!
//! Comma-separated text with header `image_name,r,g,b` and one row per
//! profiled image. Names containing commas or quotes are double-quoted with
//! embedded quotes doubled. Names never contain line breaks; the profiler
//! skips such files.

use crate::catalog::store::ColorCatalog;
use crate::color::profile::ColorProfile;
use crate::io::configuration::{CATALOG_HEADER, IMAGES_DIR};
use crate::io::error::{MosaicError, Result, file_system};
use image::Rgb;
use std::path::{Path, PathBuf};

/// Render a catalog as catalog file text
pub fn to_catalog_text(catalog: &ColorCatalog) -> String {
    let mut text = CATALOG_HEADER.join(",");
    text.push('\n');
    text.extend(catalog.entries().iter().map(|profile| {
        let [r, g, b] = profile.rgb.0;
        format!("{},{r},{g},{b}\n", quote_field(&profile.identifier))
    }));
    text
}

/// Write a catalog file, creating parent directories
///
/// # Errors
///
/// Returns a file system error if the directory or file cannot be written
pub fn write_catalog(catalog: &ColorCatalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(file_system(parent, "create directory"))?;
    }

    std::fs::write(path, to_catalog_text(catalog)).map_err(file_system(path, "write catalog"))
}

/// Read a catalog file, resolving identifiers against `<catalog_dir>/../images`
///
/// # Errors
///
/// Returns a file system error if the file cannot be read, or a format
/// error for a bad header or row
pub fn read_catalog(path: &Path) -> Result<ColorCatalog> {
    read_catalog_with_root(path, default_image_root(path))
}

/// Read a catalog file, resolving identifiers against an explicit root
///
/// # Errors
///
/// Returns a file system error if the file cannot be read, a format error
/// for a bad header or row, or `DuplicateIdentifier` for repeated names
pub fn read_catalog_with_root(path: &Path, image_root: PathBuf) -> Result<ColorCatalog> {
    let text = std::fs::read_to_string(path).map_err(file_system(path, "read catalog"))?;
    parse_catalog_text(&text, path, image_root)
}

/// Parse catalog file text
///
/// `path` only labels errors. Blank lines are ignored.
///
/// # Errors
///
/// Returns a format error for a bad header or row, or
/// `DuplicateIdentifier` for repeated names
pub fn parse_catalog_text(text: &str, path: &Path, image_root: PathBuf) -> Result<ColorCatalog> {
    let format_error = |line: usize, reason: String| MosaicError::CatalogFormat {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(format_error(1, "missing header".to_string()));
    };
    let header_fields = split_fields(header).map_err(|reason| format_error(header_line, reason))?;
    if header_fields.iter().map(String::as_str).ne(CATALOG_HEADER) {
        return Err(format_error(
            header_line,
            format!("expected header '{}'", CATALOG_HEADER.join(",")),
        ));
    }

    let mut profiles = Vec::new();
    for (line_number, line) in lines {
        let fields = split_fields(line).map_err(|reason| format_error(line_number, reason))?;
        let [name, r, g, b] = fields.as_slice() else {
            return Err(format_error(
                line_number,
                format!("expected 4 fields, found {}", fields.len()),
            ));
        };

        let channel = |label: &str, value: &str| {
            value.trim().parse::<u8>().map_err(|_parse_error| {
                format_error(
                    line_number,
                    format!("channel {label} = '{value}' is not an integer in [0,255]"),
                )
            })
        };

        profiles.push(ColorProfile::new(
            name.clone(),
            Rgb([channel("r", r)?, channel("g", g)?, channel("b", b)?]),
        ));
    }

    ColorCatalog::from_profiles(profiles, image_root)
}

/// Source image directory for a catalog stored under `analysis/`
pub fn default_image_root(catalog_path: &Path) -> PathBuf {
    catalog_path
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."))
        .join(IMAGES_DIR)
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// Splits one row, honouring double-quoted fields
fn split_fields(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
