use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pricecat_scraper::Settings;

use crate::error::CliError;

/// Run the status command: list catalog products that still lack an image.
pub(crate) fn run_status(
    snapshot: Option<PathBuf>,
    image_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let snapshot_path = snapshot.unwrap_or(settings.snapshot_path);
    let image_dir = image_dir.unwrap_or(settings.image_dir);

    let snapshot = pricecat_catalog::load_snapshot(&snapshot_path)?;
    let missing = pricecat_catalog::missing_images(&image_dir, &snapshot.records);

    log::info!(
        "{}",
        "Catalog Status".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    log::info!(
        "  Snapshot:  {} ({})",
        snapshot_path.display().if_supports_color(Stdout, |t| t.cyan()),
        snapshot.timestamp.if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "  Images:    {}",
        image_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "  Products:  {} valid, {} invalid, {} errors",
        snapshot.total_valid,
        snapshot.total_invalid,
        snapshot.total_errors,
    );
    log::info!("");

    if missing.is_empty() {
        log::info!(
            "  {} every product has an image",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        );
        return Ok(());
    }

    log::warn!(
        "  {} {} of {} products have no image:",
        "?".if_supports_color(Stdout, |t| t.yellow()),
        missing.len(),
        snapshot.records.len(),
    );
    for record in &missing {
        log::warn!("      {}={}", record.id, record.name);
    }
    log::warn!("  Fetch them with: pricecat retry --missing");
    Ok(())
}
