use serde::Deserialize;
use tokio::time::Duration;

use crate::credentials::Credentials;
use crate::error::ScrapeError;

const SEARCH_ENDPOINT: &str = "https://openapi.naver.com/v1/search/image";
const SERVICE: &str = "image search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How wide an image search casts its net, and how long to wait between
/// items when enriching with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBreadth {
    /// Number of results requested.
    pub display: u32,
    /// Size filter passed to the search service (`small`, `medium`, `large`).
    pub filter: String,
    pub item_delay: Duration,
}

impl SearchBreadth {
    /// A single medium-sized result; used for whole-catalog enrichment.
    pub fn standard() -> Self {
        Self {
            display: 1,
            filter: "medium".to_string(),
            item_delay: Duration::from_millis(200),
        }
    }

    /// Several large results; used when retrying individual products.
    pub fn thorough() -> Self {
        Self {
            display: 5,
            filter: "large".to_string(),
            item_delay: Duration::from_millis(500),
        }
    }
}

impl Default for SearchBreadth {
    fn default() -> Self {
        Self::standard()
    }
}

/// An image search backend returning candidate image URLs, best first.
#[allow(async_fn_in_trait)]
pub trait ImageSearch {
    async fn search(&self, query: &str, breadth: &SearchBreadth)
    -> Result<Vec<String>, ScrapeError>;
}

/// Client for the Naver image search API.
pub struct NaverImageClient {
    http: reqwest::Client,
    endpoint: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    link: String,
}

impl NaverImageClient {
    /// Build a client. Missing credentials are not an error here; every
    /// search then fails with a configuration error instead.
    pub fn new(creds: &Credentials) -> Result<Self, ScrapeError> {
        Self::with_endpoint(creds, SEARCH_ENDPOINT)
    }

    pub fn with_endpoint(creds: &Credentials, endpoint: &str) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            client_id: creds.client_id.clone(),
            client_secret: creds.client_secret.clone(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

impl ImageSearch for NaverImageClient {
    async fn search(
        &self,
        query: &str,
        breadth: &SearchBreadth,
    ) -> Result<Vec<String>, ScrapeError> {
        let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) else {
            return Err(ScrapeError::config("image search credentials are not configured"));
        };

        let display = breadth.display.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("query", query),
                ("display", display.as_str()),
                ("filter", breadth.filter.as_str()),
            ])
            .header("X-Naver-Client-Id", id)
            .header("X-Naver-Client-Secret", secret)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::from_status(SERVICE, status));
        }

        let body = resp.text().await?;
        parse_links(&body)
    }
}

/// Pull the non-empty `items[].link` values out of a search response.
pub(crate) fn parse_links(body: &str) -> Result<Vec<String>, ScrapeError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .map(|item| item.link)
        .filter(|link| !link.trim().is_empty())
        .collect())
}
