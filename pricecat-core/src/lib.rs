//! Domain types shared by the validation and enrichment pipelines.
//!
//! Nothing in this crate performs I/O. The scraper crate drives these types
//! against the network and the catalog crate persists them.

pub mod image;
pub mod name;
pub mod outcome;
pub mod range;
pub mod record;

pub use image::{ImageOrigin, ImageTask, ResolvedImage, image_file_name};
pub use name::{fallback_token, strip_qualifiers};
pub use outcome::{RunSummary, ValidationOutcome};
pub use range::{BatchWindow, BatchWindows, CandidateId, IdRange};
pub use record::{Catalog, CatalogRecord};
