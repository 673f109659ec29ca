//! Non-secret run settings: id bounds, batching, delays and file locations.
//!
//! Resolved the same way as [`crate::credentials`]: environment variables
//! over the config file over built-in defaults. CLI flags are applied on top
//! by the caller.

use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{ConfigFile, load_config_file};
use crate::error::ScrapeError;
use crate::pricing::DEFAULT_BASE_URL;

pub const START_ID_VAR: &str = "API_START_ID";
pub const END_ID_VAR: &str = "API_END_ID";
pub const BATCH_SIZE_VAR: &str = "API_BATCH_SIZE";
pub const BATCH_DELAY_VAR: &str = "API_DELAY_MS";
pub const INSPECT_DAY_VAR: &str = "GOOD_INSPECT_DAY";
pub const BASE_URL_VAR: &str = "PRICE_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub start_id: u32,
    pub end_id: u32,
    pub batch_size: u32,
    pub request_delay_ms: u64,
    pub batch_delay_ms: u64,
    /// Price survey date, `YYYYMMDD`.
    pub inspect_day: String,
    pub base_url: String,
    pub snapshot_path: PathBuf,
    pub image_dir: PathBuf,
    pub manifest_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_id: 1,
            end_id: 1182,
            batch_size: 10,
            request_delay_ms: 100,
            batch_delay_ms: 100,
            inspect_day: "20250404".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            snapshot_path: PathBuf::from("src/data/valid_product_ids.json"),
            image_dir: PathBuf::from("public/images/products"),
            manifest_path: PathBuf::from("src/data/product_images.json"),
        }
    }
}

impl Settings {
    /// Load settings from the process environment and the default config file.
    pub fn load() -> Result<Self, ScrapeError> {
        Self::resolve(|var| std::env::var(var).ok(), load_config_file().as_ref())
    }

    /// Resolve settings. An environment variable that is set but does not
    /// parse is a configuration error rather than a silent default.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        config: Option<&ConfigFile>,
    ) -> Result<Self, ScrapeError> {
        let mut settings = Self::default();

        if let Some(file) = config {
            settings.apply_file(file);
        }

        if let Some(v) = parse_var(&env, START_ID_VAR)? {
            settings.start_id = v;
        }
        if let Some(v) = parse_var(&env, END_ID_VAR)? {
            settings.end_id = v;
        }
        if let Some(v) = parse_var(&env, BATCH_SIZE_VAR)? {
            settings.batch_size = v;
        }
        if let Some(v) = parse_var(&env, BATCH_DELAY_VAR)? {
            settings.batch_delay_ms = v;
        }
        if let Some(v) = env(INSPECT_DAY_VAR).filter(|v| !v.trim().is_empty()) {
            settings.inspect_day = v.trim().to_string();
        }
        if let Some(v) = env(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            settings.base_url = v.trim().to_string();
        }

        Ok(settings)
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(pricing) = &file.pricing {
            if let Some(url) = &pricing.base_url {
                self.base_url = url.clone();
            }
            if let Some(day) = &pricing.inspect_day {
                self.inspect_day = day.clone();
            }
        }
        if let Some(v) = &file.validation {
            self.start_id = v.start_id.unwrap_or(self.start_id);
            self.end_id = v.end_id.unwrap_or(self.end_id);
            self.batch_size = v.batch_size.unwrap_or(self.batch_size);
            self.request_delay_ms = v.request_delay_ms.unwrap_or(self.request_delay_ms);
            self.batch_delay_ms = v.batch_delay_ms.unwrap_or(self.batch_delay_ms);
        }
        if let Some(paths) = &file.paths {
            if let Some(p) = &paths.snapshot {
                self.snapshot_path = p.clone();
            }
            if let Some(p) = &paths.image_dir {
                self.image_dir = p.clone();
            }
            if let Some(p) = &paths.manifest {
                self.manifest_path = p.clone();
            }
        }
    }
}

fn parse_var<T: FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<T>, ScrapeError> {
    match env(var) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ScrapeError::config(format!("{} is not a valid number: {:?}", var, raw))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::resolve(|_| None, None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.end_id, 1182);
    }

    #[test]
    fn env_overrides_file() {
        let file = ConfigFile {
            validation: Some(ValidationConfig {
                start_id: Some(50),
                end_id: Some(60),
                batch_size: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        let env = |var: &str| (var == END_ID_VAR).then(|| "99".to_string());
        let settings = Settings::resolve(env, Some(&file)).unwrap();
        assert_eq!(settings.start_id, 50);
        assert_eq!(settings.end_id, 99);
        assert_eq!(settings.batch_size, 3);
    }

    #[test]
    fn unparsable_env_is_config_error() {
        let env = |var: &str| (var == BATCH_SIZE_VAR).then(|| "ten".to_string());
        assert!(matches!(
            Settings::resolve(env, None),
            Err(ScrapeError::Config(_))
        ));
    }

    #[test]
    fn config_file_parses_from_toml() {
        let file: ConfigFile = toml::from_str(
            r#"
[pricing]
inspect_day = "20250101"

[paths]
image_dir = "out/images"
"#,
        )
        .unwrap();
        let settings = Settings::resolve(|_| None, Some(&file)).unwrap();
        assert_eq!(settings.inspect_day, "20250101");
        assert_eq!(settings.image_dir, PathBuf::from("out/images"));
    }
}
