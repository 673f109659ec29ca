//! Durable outputs of the pipeline: the catalog snapshot handed from the
//! validation run to the enrichment run, and the per-id image store.

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::CatalogError;
pub use snapshot::{CatalogSnapshot, FailedId, load_snapshot, write_snapshot};
pub use store::{
    ImageManifest, IMAGE_EXTENSIONS, ensure_image_dir, has_image, missing_images, scan_images,
    write_manifest,
};
