use std::fmt;
use std::path::{Path, PathBuf};

use crate::range::CandidateId;
use crate::record::CatalogRecord;

/// File name of the image stored for a catalog id.
pub fn image_file_name(id: CandidateId) -> String {
    format!("{}.jpg", id)
}

/// Which link of the resolution chain produced an image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOrigin {
    Primary,
    Fallback,
}

impl fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "search"),
            Self::Fallback => write!(f, "placeholder"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub source_url: String,
    pub origin: ImageOrigin,
}

impl ResolvedImage {
    pub fn primary(url: impl Into<String>) -> Self {
        Self {
            source_url: url.into(),
            origin: ImageOrigin::Primary,
        }
    }

    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            source_url: url.into(),
            origin: ImageOrigin::Fallback,
        }
    }
}

/// One unit of enrichment work, derived from a catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub id: CandidateId,
    pub name: String,
    pub destination: PathBuf,
}

impl ImageTask {
    pub fn new(id: CandidateId, name: impl Into<String>, image_dir: &Path) -> Self {
        Self {
            id,
            name: name.into(),
            destination: image_dir.join(image_file_name(id)),
        }
    }

    pub fn for_record(record: &CatalogRecord, image_dir: &Path) -> Self {
        Self::new(record.id, record.name.clone(), image_dir)
    }
}
