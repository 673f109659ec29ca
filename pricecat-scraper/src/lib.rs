pub mod async_util;
pub mod batch;
pub mod config;
pub mod credentials;
pub mod download;
pub mod enrich;
pub mod error;
pub mod log;
pub mod pricing;
pub mod resolve;
pub mod search;
pub mod settings;
pub mod validate;
pub mod xml;

pub use async_util::run_with_events;
pub use batch::{ValidationEvent, ValidationOptions, ValidationReport, run_validation};
pub use config::config_path;
pub use credentials::{CredentialSource, CredentialSources, Credentials, credential_sources};
pub use download::{DownloadOutcome, HttpFetcher, ImageDownloader, ImageFetcher};
pub use enrich::{EnrichEvent, EnrichOptions, EnrichReport, run_enrichment};
pub use error::ScrapeError;
pub use log::{EnrichLog, EnrichSummary, LogEntry};
pub use pricing::{PricingClient, PricingService};
pub use resolve::{ImageResolver, placeholder_url, resolve_fallback};
pub use search::{ImageSearch, NaverImageClient, SearchBreadth};
pub use settings::Settings;
pub use validate::RecordValidator;
