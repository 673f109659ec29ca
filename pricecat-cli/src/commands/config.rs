use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pricecat_scraper::{CredentialSource, Credentials, Settings};

use crate::error::CliError;

fn mask_value(s: &str) -> String {
    if s.chars().count() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", s.chars().take(2).collect::<String>())
    }
}

fn print_field(name: &str, value: Option<String>, source: Option<&CredentialSource>) {
    let source_str = source.map(|s| format!("({})", s)).unwrap_or_default();
    match value {
        Some(v) => {
            log::info!(
                "  {} {} {}",
                format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                v,
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  {} {} {}",
                format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
}

/// Show current settings, credentials and where each credential comes from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = pricecat_scraper::config_path();

    log::info!(
        "{}",
        "pricecat Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let creds = Credentials::load();
    let sources = pricecat_scraper::credential_sources();
    log::info!("{}", "Credentials".if_supports_color(Stdout, |t| t.bold()));
    print_field(
        "service_key",
        creds.service_key.as_deref().map(mask_value),
        Some(&sources.service_key),
    );
    print_field(
        "client_id",
        creds.client_id.clone(),
        Some(&sources.client_id),
    );
    print_field(
        "client_secret",
        creds.client_secret.as_deref().map(mask_value),
        Some(&sources.client_secret),
    );
    log::info!("");

    let settings = Settings::load()?;
    log::info!("{}", "Settings".if_supports_color(Stdout, |t| t.bold()));
    print_field(
        "ids",
        Some(format!("{}..={}", settings.start_id, settings.end_id)),
        None,
    );
    print_field("batch_size", Some(settings.batch_size.to_string()), None);
    print_field(
        "delays",
        Some(format!(
            "{} ms between ids, {} ms between batches",
            settings.request_delay_ms, settings.batch_delay_ms
        )),
        None,
    );
    print_field("inspect_day", Some(settings.inspect_day.clone()), None);
    print_field("base_url", Some(settings.base_url.clone()), None);
    print_field(
        "snapshot",
        Some(settings.snapshot_path.display().to_string()),
        None,
    );
    print_field(
        "image_dir",
        Some(settings.image_dir.display().to_string()),
        None,
    );
    print_field(
        "manifest",
        Some(settings.manifest_path.display().to_string()),
        None,
    );

    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match pricecat_scraper::config_path() {
        Some(path) => {
            log::info!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::runtime("could not determine config directory")),
    }
}
