//! The image store: one file per catalog id in a single directory.
//!
//! Presence of `{id}.jpg` is the only record of a finished enrichment, so
//! these helpers are what makes an enrichment run resumable.

use std::path::Path;

use pricecat_core::{CatalogRecord, image_file_name};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// File extensions counted as images when scanning the store.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Create the image directory (and parents) if it does not exist.
pub fn ensure_image_dir(dir: &Path) -> Result<(), CatalogError> {
    if !dir.is_dir() {
        log::info!("Creating image directory {}", dir.display());
        std::fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;
    }
    Ok(())
}

/// Whether the store already holds an image for this record.
pub fn has_image(dir: &Path, record: &CatalogRecord) -> bool {
    dir.join(image_file_name(record.id)).is_file()
}

/// Records that have no image file yet, in catalog order.
pub fn missing_images<'a>(dir: &Path, records: &'a [CatalogRecord]) -> Vec<&'a CatalogRecord> {
    records.iter().filter(|r| !has_image(dir, r)).collect()
}

/// List image file names in `dir`, sorted by name.
pub fn scan_images(dir: &Path) -> Result<Vec<String>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::DirNotFound(dir.display().to_string()));
    }

    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map_err(|e| CatalogError::io(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter(|e| {
            e.path().extension().and_then(|x| x.to_str()).is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
        })
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}

/// List of image files published for presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageManifest {
    pub generated: String,
    pub images: Vec<String>,
}

/// Scan `image_dir` and write its manifest to `output`.
///
/// Fails with [`CatalogError::NoImages`] when the directory holds no images.
pub fn write_manifest(image_dir: &Path, output: &Path) -> Result<ImageManifest, CatalogError> {
    let images = scan_images(image_dir)?;
    if images.is_empty() {
        return Err(CatalogError::NoImages(image_dir.display().to_string()));
    }

    let manifest = ImageManifest {
        generated: chrono::Utc::now().to_rfc3339(),
        images,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(&manifest).map_err(|e| CatalogError::json(output, e))?;
    std::fs::write(output, json).map_err(|e| CatalogError::io(output, e))?;

    Ok(manifest)
}
