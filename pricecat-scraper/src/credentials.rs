use crate::config::{ConfigFile, load_config_file};
use crate::error::ScrapeError;

pub const SERVICE_KEY_VAR: &str = "PRODUCT_API_KEY";
pub const CLIENT_ID_VAR: &str = "NAVER_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "NAVER_CLIENT_SECRET";

/// API credentials for the pricing and image-search services.
///
/// Every field is optional at load time. The pricing key is required by a
/// validation run; image-search credentials only decide whether real image
/// search is attempted.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub service_key: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub service_key: CredentialSource,
    pub client_id: CredentialSource,
    pub client_secret: CredentialSource,
}

impl Credentials {
    /// Load credentials from environment variables, then the config file.
    pub fn load() -> Self {
        Self::resolve(|var| std::env::var(var).ok(), load_config_file().as_ref())
    }

    /// Resolve credentials from an environment lookup and an optional config
    /// file. Priority: env vars > config file.
    pub fn resolve(env: impl Fn(&str) -> Option<String>, config: Option<&ConfigFile>) -> Self {
        let pricing = config.and_then(|c| c.pricing.as_ref());
        let search = config.and_then(|c| c.image_search.as_ref());

        Self {
            service_key: non_empty(env(SERVICE_KEY_VAR))
                .or_else(|| pricing.and_then(|p| non_empty(p.service_key.clone()))),
            client_id: non_empty(env(CLIENT_ID_VAR))
                .or_else(|| search.and_then(|s| non_empty(s.client_id.clone()))),
            client_secret: non_empty(env(CLIENT_SECRET_VAR))
                .or_else(|| search.and_then(|s| non_empty(s.client_secret.clone()))),
        }
    }

    /// The pricing service key, or the configuration error that aborts a
    /// validation run.
    pub fn require_service_key(&self) -> Result<&str, ScrapeError> {
        self.service_key.as_deref().ok_or_else(|| {
            ScrapeError::config(format!(
                "Missing pricing service key. Set {} or add service_key to the [pricing] table of the config file",
                SERVICE_KEY_VAR
            ))
        })
    }

    /// Whether both image-search credentials are present.
    pub fn has_image_search(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    sources_from(|var| std::env::var(var).ok(), load_config_file().as_ref())
}

pub fn sources_from(
    env: impl Fn(&str) -> Option<String>,
    config: Option<&ConfigFile>,
) -> CredentialSources {
    let pricing = config.and_then(|c| c.pricing.as_ref());
    let search = config.and_then(|c| c.image_search.as_ref());

    let source = |var: &'static str, in_file: bool| {
        if non_empty(env(var)).is_some() {
            CredentialSource::EnvVar(var)
        } else if in_file {
            CredentialSource::ConfigFile
        } else {
            CredentialSource::Missing
        }
    };

    CredentialSources {
        service_key: source(
            SERVICE_KEY_VAR,
            pricing.is_some_and(|p| non_empty(p.service_key.clone()).is_some()),
        ),
        client_id: source(
            CLIENT_ID_VAR,
            search.is_some_and(|s| non_empty(s.client_id.clone()).is_some()),
        ),
        client_secret: source(
            CLIENT_SECRET_VAR,
            search.is_some_and(|s| non_empty(s.client_secret.clone()).is_some()),
        ),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;
