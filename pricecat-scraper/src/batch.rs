//! Batched validation of an id range.
//!
//! Ids are validated strictly one at a time, window by window, with a pause
//! between consecutive ids inside a window and a separate pause between
//! windows. Progress is reported through [`ValidationEvent`]s.

use std::num::NonZeroU32;

use pricecat_catalog::{CatalogSnapshot, FailedId};
use pricecat_core::{BatchWindow, Catalog, IdRange, RunSummary, ValidationOutcome};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Duration;

use crate::error::ScrapeError;
use crate::pricing::PricingService;
use crate::settings::Settings;
use crate::validate::RecordValidator;

/// Parameters of one validation run.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub range: IdRange,
    pub batch_size: NonZeroU32,
    /// Pause between consecutive ids within a window.
    pub request_delay: Duration,
    /// Pause between consecutive windows.
    pub batch_delay: Duration,
}

impl ValidationOptions {
    pub fn new(
        start: u32,
        end: u32,
        batch_size: u32,
        request_delay: Duration,
        batch_delay: Duration,
    ) -> Result<Self, ScrapeError> {
        let range = IdRange::new(start, end).ok_or_else(|| {
            ScrapeError::config(format!("start id {} is greater than end id {}", start, end))
        })?;
        let batch_size = NonZeroU32::new(batch_size)
            .ok_or_else(|| ScrapeError::config("batch size must be at least 1"))?;

        Ok(Self {
            range,
            batch_size,
            request_delay,
            batch_delay,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ScrapeError> {
        Self::new(
            settings.start_id,
            settings.end_id,
            settings.batch_size,
            Duration::from_millis(settings.request_delay_ms),
            Duration::from_millis(settings.batch_delay_ms),
        )
    }

    pub fn batch_count(&self) -> u64 {
        self.range.window_count(self.batch_size)
    }
}

/// Progress events emitted by [`run_validation`].
#[derive(Debug, Clone)]
pub enum ValidationEvent {
    Started {
        range: IdRange,
        total: u64,
        batches: u64,
    },
    BatchStarted {
        window: BatchWindow,
    },
    Checked {
        outcome: ValidationOutcome,
    },
    /// `processed` counts ids checked so far across the whole run.
    BatchFinished {
        window: BatchWindow,
        processed: u64,
        total: u64,
    },
    Done {
        summary: RunSummary,
    },
}

/// Everything a validation run produced.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub summary: RunSummary,
    pub catalog: Catalog,
    pub errors: Vec<FailedId>,
}

impl ValidationReport {
    /// The snapshot to persist for this run.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot::new(&self.catalog, &self.summary, self.errors.clone())
    }
}

/// Validate every id in `options.range`.
///
/// Individual failures never abort the run; they are counted and reported
/// in [`ValidationReport::errors`]. The sender is consumed so the event
/// channel closes when the run ends.
pub async fn run_validation<S: PricingService>(
    validator: &RecordValidator<S>,
    options: &ValidationOptions,
    events: UnboundedSender<ValidationEvent>,
) -> ValidationReport {
    let total = options.range.len();
    let batches = options.batch_count();
    let mut summary = RunSummary::default();
    let mut catalog = Catalog::default();
    let mut errors = Vec::new();

    log::info!(
        "Validating ids {} ({} ids, {} batches of {})",
        options.range,
        total,
        batches,
        options.batch_size
    );
    let _ = events.send(ValidationEvent::Started {
        range: options.range,
        total,
        batches,
    });

    for (batch_index, window) in options.range.windows(options.batch_size).enumerate() {
        if batch_index > 0 {
            pause(options.batch_delay).await;
        }
        log::debug!("Batch {}/{}: {}", batch_index + 1, batches, window);
        let _ = events.send(ValidationEvent::BatchStarted { window });

        for (i, id) in window.ids().enumerate() {
            if i > 0 {
                pause(options.request_delay).await;
            }

            let outcome = validator.validate(id).await;
            summary.record(&outcome);
            match &outcome {
                ValidationOutcome::Valid { .. } => {
                    if let Some(record) = outcome.to_record() {
                        catalog.insert(record);
                    }
                }
                ValidationOutcome::Errored { id, message } => errors.push(FailedId {
                    id: *id,
                    message: message.clone(),
                }),
                ValidationOutcome::Invalid { .. } => {}
            }
            let _ = events.send(ValidationEvent::Checked { outcome });
        }

        let _ = events.send(ValidationEvent::BatchFinished {
            window,
            processed: summary.total_processed,
            total,
        });
    }

    log::info!(
        "Validation finished: {} valid, {} invalid, {} errors",
        summary.valid_count,
        summary.invalid_count,
        summary.error_count
    );
    let _ = events.send(ValidationEvent::Done { summary });

    ValidationReport {
        summary,
        catalog,
        errors,
    }
}

/// Sleep for `delay`, skipping the timer entirely when it is zero.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
