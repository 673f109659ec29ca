use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pricecat_core::{CandidateId, ImageTask};
use pricecat_scraper::{
    Credentials, EnrichEvent, EnrichOptions, HttpFetcher, ImageDownloader, ImageResolver,
    LogEntry, NaverImageClient, SearchBreadth, Settings,
};

use crate::error::CliError;

/// Run the enrich command over the whole snapshot.
pub(crate) fn run_enrich(
    snapshot: Option<PathBuf>,
    image_dir: Option<PathBuf>,
    limit: Option<usize>,
    no_log: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let snapshot_path = snapshot.unwrap_or(settings.snapshot_path);
    let image_dir = image_dir.unwrap_or(settings.image_dir);

    let snapshot = pricecat_catalog::load_snapshot(&snapshot_path)?;
    log::info!(
        "Loaded {} products from {}",
        snapshot.records.len(),
        snapshot_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let mut tasks: Vec<ImageTask> = snapshot
        .records
        .iter()
        .map(|r| ImageTask::for_record(r, &image_dir))
        .collect();
    if let Some(n) = limit {
        tasks.truncate(n);
        log::info!(
            "{}",
            format!("Limit: {} products", n).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let options = EnrichOptions::new(&image_dir, &SearchBreadth::standard());
    enrich_tasks(&tasks, SearchBreadth::standard(), options, no_log, quiet)
}

/// Arguments of the retry command.
pub(crate) struct RetryArgs {
    pub ids: Vec<u32>,
    pub items: Vec<String>,
    pub missing: bool,
    pub force: bool,
    pub snapshot: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    pub no_log: bool,
}

/// Run the retry command: targeted enrichment with a wider search.
pub(crate) fn run_retry(args: RetryArgs, quiet: bool) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let image_dir = args.image_dir.unwrap_or(settings.image_dir);

    let mut selected: Vec<(CandidateId, String)> = args
        .items
        .iter()
        .map(|item| parse_item(item))
        .collect::<Result<_, _>>()?;

    if !args.ids.is_empty() || args.missing {
        let snapshot_path = args.snapshot.unwrap_or(settings.snapshot_path);
        let catalog = pricecat_catalog::load_snapshot(&snapshot_path)?.catalog();

        for id in &args.ids {
            match catalog.get(*id) {
                Some(record) => selected.push((record.id, record.name.clone())),
                None => log::warn!(
                    "  {} id {} is not in {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    id,
                    snapshot_path.display(),
                ),
            }
        }
        if args.missing {
            for record in pricecat_catalog::missing_images(&image_dir, catalog.records()) {
                selected.push((record.id, record.name.clone()));
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    let tasks: Vec<ImageTask> = selected
        .into_iter()
        .filter(|(id, _)| seen.insert(*id))
        .map(|(id, name)| ImageTask::new(id, name, &image_dir))
        .collect();

    if tasks.is_empty() {
        return Err(CliError::argument(
            "nothing to retry; pass --ids, --item ID=NAME or --missing",
        ));
    }

    let breadth = SearchBreadth::thorough();
    let mut options = EnrichOptions::new(&image_dir, &breadth);
    options.force_redownload = args.force;
    log::info!("Retrying {} products with a wider image search", tasks.len());
    enrich_tasks(&tasks, breadth, options, args.no_log, quiet)
}

/// Parse an `ID=NAME` pair.
fn parse_item(raw: &str) -> Result<(CandidateId, String), CliError> {
    let (id, name) = raw
        .split_once('=')
        .ok_or_else(|| CliError::argument(format!("expected ID=NAME, got {:?}", raw)))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| CliError::argument(format!("not a product id: {:?}", id)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::argument(format!("missing product name in {:?}", raw)));
    }
    Ok((id, name.to_string()))
}

fn enrich_tasks(
    tasks: &[ImageTask],
    breadth: SearchBreadth,
    options: EnrichOptions,
    no_log: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let creds = Credentials::load();
    if !creds.has_image_search() {
        log::warn!(
            "{} Image search credentials not set; placeholder images will be used",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    let resolver = ImageResolver::new(NaverImageClient::new(&creds)?, breadth);
    let downloader = ImageDownloader::new(HttpFetcher::new()?);

    log::info!(
        "Images: {}",
        options.image_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    };

    let rt = crate::runtime()?;
    let result = rt.block_on(async {
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<EnrichEvent>();
        let future =
            pricecat_scraper::run_enrichment(tasks, &resolver, &downloader, &options, event_tx);

        let mut total = 0usize;
        pricecat_scraper::run_with_events(future, event_rx, |e| match e {
            EnrichEvent::Started { total: t } => total = t,
            EnrichEvent::ItemStarted { index, id, name } => {
                pb.set_message(format!("[{}/{}] {} {}", index + 1, total, id, name));
            }
            EnrichEvent::ItemResolved { index, id, origin } => {
                pb.set_message(format!("[{}/{}] {} downloading ({})", index + 1, total, id, origin));
            }
            EnrichEvent::ItemSkipped { .. } | EnrichEvent::ItemCompleted { .. } => {}
            EnrichEvent::ItemFailed { id, reason, .. } => {
                pb.suspend(|| {
                    log::warn!(
                        "  {} {}: {}",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        id,
                        reason,
                    );
                });
            }
            EnrichEvent::Done { .. } => {}
        })
        .await
    });
    pb.finish_and_clear();

    let report = result?;
    let summary = report.log.summary();

    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} images downloaded (search: {}, placeholder: {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.downloaded,
        summary.from_search,
        summary.from_placeholder,
    );
    if summary.skipped > 0 {
        log::info!("  - {} already present", summary.skipped);
    }
    if report.failure_count > 0 {
        log::warn!(
            "  {} {} failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            report.failure_count,
        );
        for entry in report.log.entries() {
            if let LogEntry::Failed { id, name, .. } = entry {
                log::warn!("      {}={}", id, name);
            }
        }
        log::warn!("  Retry them with: pricecat retry --missing");
    }
    log::info!(
        "  {} of {} products have an image",
        report.success_count,
        tasks.len()
    );

    if !no_log {
        let log_path = enrich_log_path(&options.image_dir);
        match report.log.write_to_file(&log_path) {
            Ok(()) => log::info!(
                "  Log written to {}",
                log_path.display().if_supports_color(Stdout, |t| t.dimmed()),
            ),
            Err(e) => log::warn!("Warning: could not write enrichment log: {}", e),
        }
    }

    Ok(())
}

/// Timestamped log file placed next to the image directory.
fn enrich_log_path(image_dir: &Path) -> PathBuf {
    let name = format!(
        "enrich-log-{}.txt",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    match image_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
