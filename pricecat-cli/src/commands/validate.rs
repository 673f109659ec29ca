use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pricecat_core::ValidationOutcome;
use pricecat_scraper::{
    Credentials, PricingClient, RecordValidator, Settings, ValidationEvent, ValidationOptions,
};

use crate::error::CliError;

/// Flag overrides for a validation run; `None` keeps the configured value.
pub(crate) struct ValidateArgs {
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub batch_size: Option<u32>,
    pub request_delay_ms: Option<u64>,
    pub batch_delay_ms: Option<u64>,
    pub inspect_day: Option<String>,
    pub output: Option<PathBuf>,
}

impl ValidateArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.start {
            settings.start_id = v;
        }
        if let Some(v) = self.end {
            settings.end_id = v;
        }
        if let Some(v) = self.batch_size {
            settings.batch_size = v;
        }
        if let Some(v) = self.request_delay_ms {
            settings.request_delay_ms = v;
        }
        if let Some(v) = self.batch_delay_ms {
            settings.batch_delay_ms = v;
        }
        if let Some(v) = self.inspect_day {
            settings.inspect_day = v;
        }
        if let Some(v) = self.output {
            settings.snapshot_path = v;
        }
    }
}

/// Run the validate command.
pub(crate) fn run_validate(args: ValidateArgs, quiet: bool) -> Result<(), CliError> {
    let mut settings = Settings::load()?;
    args.apply(&mut settings);

    let options = ValidationOptions::from_settings(&settings)?;
    let client = PricingClient::new(&Credentials::load(), &settings)?;
    let validator = RecordValidator::new(client);

    log::info!(
        "Validating ids {} in batches of {}",
        options.range.if_supports_color(Stdout, |t| t.cyan()),
        options.batch_size,
    );
    log::info!(
        "{}",
        format!(
            "Price date: {}, delays: {} ms between ids, {} ms between batches",
            settings.inspect_day, settings.request_delay_ms, settings.batch_delay_ms
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(options.range.len());
        pb.set_style(
            ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        pb
    };

    let rt = crate::runtime()?;
    let report = rt.block_on(async {
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<ValidationEvent>();
        let future = pricecat_scraper::run_validation(&validator, &options, event_tx);

        pricecat_scraper::run_with_events(future, event_rx, |e| match e {
            ValidationEvent::Started { .. } => {}
            ValidationEvent::BatchStarted { window } => {
                pb.set_message(format!("batch {}", window));
            }
            ValidationEvent::Checked { outcome } => {
                pb.inc(1);
                match outcome {
                    ValidationOutcome::Valid { id, name, price } => {
                        pb.suspend(|| {
                            log::info!(
                                "  {} {} {} ({})",
                                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                                id,
                                name,
                                price,
                            );
                        });
                    }
                    ValidationOutcome::Errored { id, message } => {
                        pb.suspend(|| {
                            log::warn!(
                                "  {} {} {}",
                                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                                id,
                                message,
                            );
                        });
                    }
                    ValidationOutcome::Invalid { .. } => {}
                }
            }
            ValidationEvent::BatchFinished {
                processed, total, ..
            } => {
                pb.set_message(format!(
                    "{:.1}%",
                    processed as f64 * 100.0 / total.max(1) as f64
                ));
            }
            ValidationEvent::Done { .. } => {}
        })
        .await
    });
    pb.finish_and_clear();

    let snapshot = report.snapshot();
    pricecat_catalog::write_snapshot(&settings.snapshot_path, &snapshot)?;

    let summary = &report.summary;
    log::info!("");
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} valid products",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.valid_count,
    );
    log::info!("  - {} ids without a priced product", summary.invalid_count);
    if summary.error_count > 0 {
        log::warn!(
            "  {} {} lookups failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.error_count,
        );
    }
    log::info!("  {} ids processed", summary.total_processed);
    log::info!(
        "  Snapshot written to {}",
        settings.snapshot_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    Ok(())
}
