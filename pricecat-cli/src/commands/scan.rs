use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pricecat_scraper::Settings;

use crate::error::CliError;

/// Run the scan command: publish the list of stored images.
pub(crate) fn run_scan(image_dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let image_dir = image_dir.unwrap_or(settings.image_dir);
    let output = output.unwrap_or(settings.manifest_path);

    let manifest = pricecat_catalog::write_manifest(&image_dir, &output)?;

    log::info!(
        "{} {} images listed in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        manifest.images.len(),
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
