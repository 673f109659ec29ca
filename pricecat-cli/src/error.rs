use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Snapshot, image store or manifest error
    #[error("{0}")]
    Catalog(#[from] pricecat_catalog::CatalogError),

    /// Service, credential or driver error
    #[error("{0}")]
    Scrape(#[from] pricecat_scraper::ScrapeError),

    /// Invalid command-line input
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
