//! Image enrichment of catalog records.
//!
//! One driver serves both the full pass over a snapshot and targeted retries
//! of individual products; the two differ only in their input list and the
//! [`SearchBreadth`] of the resolver they are given.

use std::path::PathBuf;

use pricecat_catalog::ensure_image_dir;
use pricecat_core::{CandidateId, ImageOrigin, ImageTask, ResolvedImage};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Duration;

use crate::batch::pause;
use crate::download::{DownloadOutcome, ImageDownloader, ImageFetcher};
use crate::error::ScrapeError;
use crate::log::{EnrichLog, LogEntry};
use crate::resolve::{ImageResolver, resolve_fallback};
use crate::search::{ImageSearch, SearchBreadth};

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub image_dir: PathBuf,
    /// Pause after each item that needed network work.
    pub item_delay: Duration,
    /// Re-fetch even when an image is already stored.
    pub force_redownload: bool,
}

impl EnrichOptions {
    pub fn new(image_dir: impl Into<PathBuf>, breadth: &SearchBreadth) -> Self {
        Self {
            image_dir: image_dir.into(),
            item_delay: breadth.item_delay,
            force_redownload: false,
        }
    }
}

/// Progress events emitted by [`run_enrichment`].
#[derive(Debug, Clone)]
pub enum EnrichEvent {
    Started {
        total: usize,
    },
    ItemStarted {
        index: usize,
        id: CandidateId,
        name: String,
    },
    /// The image was already stored; no resolver or fetch was used.
    ItemSkipped {
        index: usize,
        id: CandidateId,
    },
    ItemResolved {
        index: usize,
        id: CandidateId,
        origin: ImageOrigin,
    },
    ItemCompleted {
        index: usize,
        id: CandidateId,
        bytes: usize,
    },
    ItemFailed {
        index: usize,
        id: CandidateId,
        reason: String,
    },
    Done {
        success_count: usize,
        failure_count: usize,
    },
}

#[derive(Debug)]
pub struct EnrichReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub log: EnrichLog,
}

/// Attach an image to every task, in order.
///
/// Per-item failures are recorded and the run continues. The only fatal
/// error is being unable to create the image directory.
pub async fn run_enrichment<S: ImageSearch, F: ImageFetcher>(
    tasks: &[ImageTask],
    resolver: &ImageResolver<S>,
    downloader: &ImageDownloader<F>,
    options: &EnrichOptions,
    events: UnboundedSender<EnrichEvent>,
) -> Result<EnrichReport, ScrapeError> {
    ensure_image_dir(&options.image_dir)?;

    let total = tasks.len();
    let mut log = EnrichLog::new();
    let mut success_count = 0;
    let mut failure_count = 0;

    log::info!("Enriching {} products into {}", total, options.image_dir.display());
    let _ = events.send(EnrichEvent::Started { total });

    for (index, task) in tasks.iter().enumerate() {
        let id = task.id;
        let _ = events.send(EnrichEvent::ItemStarted {
            index,
            id,
            name: task.name.clone(),
        });

        let source = async {
            let image = resolve(resolver, &task.name).await;
            let _ = events.send(EnrichEvent::ItemResolved {
                index,
                id,
                origin: image.origin,
            });
            image
        };
        let (outcome, image) = if options.force_redownload {
            let image = source.await;
            let outcome = downloader.download(&image.source_url, &task.destination).await;
            (outcome, Some(image))
        } else {
            downloader.ensure_downloaded(&task.destination, source).await
        };

        match (outcome, image) {
            (DownloadOutcome::Downloaded { bytes }, Some(image)) => {
                log::info!(
                    "[{}/{}] {} {} saved ({})",
                    index + 1,
                    total,
                    id,
                    task.name,
                    image.origin
                );
                success_count += 1;
                log.add(LogEntry::Downloaded {
                    id,
                    name: task.name.clone(),
                    origin: image.origin,
                    url: image.source_url,
                });
                let _ = events.send(EnrichEvent::ItemCompleted { index, id, bytes });
            }
            (DownloadOutcome::Failed { message }, image) => {
                log::warn!("[{}/{}] {} {} failed: {}", index + 1, total, id, task.name, message);
                failure_count += 1;
                log.add(LogEntry::Failed {
                    id,
                    name: task.name.clone(),
                    url: image.map(|image| image.source_url),
                    message: message.clone(),
                });
                let _ = events.send(EnrichEvent::ItemFailed {
                    index,
                    id,
                    reason: message,
                });
            }
            // Already stored: nothing was resolved or fetched, so no pause either.
            _ => {
                log::debug!("[{}/{}] {} already has an image", index + 1, total, id);
                success_count += 1;
                log.add(LogEntry::Skipped {
                    id,
                    name: task.name.clone(),
                });
                let _ = events.send(EnrichEvent::ItemSkipped { index, id });
                continue;
            }
        }

        if index + 1 < total {
            pause(options.item_delay).await;
        }
    }

    log::info!(
        "Enrichment finished: {} succeeded, {} failed",
        success_count,
        failure_count
    );
    let _ = events.send(EnrichEvent::Done {
        success_count,
        failure_count,
    });

    Ok(EnrichReport {
        success_count,
        failure_count,
        log,
    })
}

async fn resolve<S: ImageSearch>(resolver: &ImageResolver<S>, name: &str) -> ResolvedImage {
    match resolver.resolve_primary(name).await {
        Some(image) => image,
        None => {
            log::debug!("Falling back to a placeholder for {:?}", name);
            resolve_fallback(name)
        }
    }
}
