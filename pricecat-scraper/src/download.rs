//! Idempotent image downloads into the image directory.

use std::path::Path;

use pricecat_core::ResolvedImage;
use tokio::time::Duration;

use crate::error::ScrapeError;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const SERVICE: &str = "image host";

/// Fetches the raw bytes behind an image URL.
#[allow(async_fn_in_trait)]
pub trait ImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScrapeError>;
}

/// HTTP fetcher with a per-request timeout.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::from_status(SERVICE, status));
        }
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Result of one download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The destination already existed; nothing was fetched.
    Skipped,
    Downloaded { bytes: usize },
    Failed { message: String },
}

impl DownloadOutcome {
    /// `Skipped` counts as success: the image is in place either way.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Writes fetched images to disk, never overwriting unless asked.
pub struct ImageDownloader<F> {
    fetcher: F,
}

impl<F: ImageFetcher> ImageDownloader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Whether an image is already stored at `destination`.
    pub fn is_done(&self, destination: &Path) -> bool {
        destination.is_file()
    }

    /// Fetch an image into `destination` unless a file is already there.
    ///
    /// `source` is only awaited when a fetch is needed, so a stored image
    /// costs no lookup. The image it yielded comes back with the outcome.
    pub async fn ensure_downloaded(
        &self,
        destination: &Path,
        source: impl Future<Output = ResolvedImage>,
    ) -> (DownloadOutcome, Option<ResolvedImage>) {
        if self.is_done(destination) {
            log::debug!("{} exists, skipping", destination.display());
            return (DownloadOutcome::Skipped, None);
        }
        let image = source.await;
        let outcome = self.download(&image.source_url, destination).await;
        (outcome, Some(image))
    }

    /// Fetch `url` into `destination`, replacing any existing file.
    ///
    /// Bytes land in a `.part` file first, so an interrupted download never
    /// leaves something that [`is_done`](Self::is_done) would accept.
    pub async fn download(&self, url: &str, destination: &Path) -> DownloadOutcome {
        match self.try_download(url, destination).await {
            Ok(bytes) => {
                log::debug!("Saved {} bytes to {}", bytes, destination.display());
                DownloadOutcome::Downloaded { bytes }
            }
            Err(e) => {
                log::warn!("Download of {} failed: {}", url, e);
                DownloadOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn try_download(&self, url: &str, destination: &Path) -> Result<usize, ScrapeError> {
        let bytes = self.fetcher.fetch(url).await?;
        if bytes.is_empty() {
            return Err(ScrapeError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "empty response body",
            )));
        }

        let part = destination.with_extension("jpg.part");
        if let Err(e) = std::fs::write(&part, &bytes) {
            let _ = std::fs::remove_file(&part);
            return Err(e.into());
        }
        if let Err(e) = std::fs::rename(&part, destination) {
            let _ = std::fs::remove_file(&part);
            return Err(e.into());
        }
        Ok(bytes.len())
    }
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
