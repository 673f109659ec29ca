use super::*;
use crate::config::{ImageSearchConfig, PricingConfig};
use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var| map.get(var).cloned()
}

fn file_with_key(key: &str) -> ConfigFile {
    ConfigFile {
        pricing: Some(PricingConfig {
            service_key: Some(key.to_string()),
            ..Default::default()
        }),
        image_search: Some(ImageSearchConfig {
            client_id: Some("file-id".to_string()),
            client_secret: None,
        }),
        ..Default::default()
    }
}

#[test]
fn env_beats_config_file() {
    let file = file_with_key("from-file");
    let creds = Credentials::resolve(env_of(&[(SERVICE_KEY_VAR, "from-env")]), Some(&file));
    assert_eq!(creds.service_key.as_deref(), Some("from-env"));
    assert_eq!(creds.client_id.as_deref(), Some("file-id"));
    assert!(!creds.has_image_search());
}

#[test]
fn blank_env_falls_through_to_file() {
    let file = file_with_key("from-file");
    let creds = Credentials::resolve(env_of(&[(SERVICE_KEY_VAR, "  ")]), Some(&file));
    assert_eq!(creds.service_key.as_deref(), Some("from-file"));
}

#[test]
fn missing_service_key_is_config_error() {
    let creds = Credentials::resolve(env_of(&[]), None);
    assert!(matches!(
        creds.require_service_key(),
        Err(ScrapeError::Config(_))
    ));
}

#[test]
fn sources_report_provenance() {
    let file = file_with_key("from-file");
    let sources = sources_from(env_of(&[(CLIENT_SECRET_VAR, "s")]), Some(&file));
    assert_eq!(sources.service_key, CredentialSource::ConfigFile);
    assert_eq!(sources.client_id, CredentialSource::ConfigFile);
    assert_eq!(sources.client_secret, CredentialSource::EnvVar(CLIENT_SECRET_VAR));

    let sources = sources_from(env_of(&[]), None);
    assert_eq!(sources.service_key, CredentialSource::Missing);
}
