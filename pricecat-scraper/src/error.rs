/// Errors that can occur while talking to the pricing and image services.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by {0}")]
    RateLimit(&'static str),

    #[error("Server error (HTTP {status}) from {service}")]
    Status { service: &'static str, status: u16 },

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] pricecat_catalog::CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a non-success HTTP status to the matching error.
    pub(crate) fn from_status(service: &'static str, status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit(service)
        } else {
            Self::Status {
                service,
                status: status.as_u16(),
            }
        }
    }
}
