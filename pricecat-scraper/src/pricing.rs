use pricecat_core::CandidateId;
use tokio::time::Duration;

use crate::credentials::Credentials;
use crate::error::ScrapeError;
use crate::settings::Settings;

pub const DEFAULT_BASE_URL: &str =
    "http://openapi.price.go.kr/openApiImpl/ProductPriceInfoService";
const SERVICE: &str = "pricing service";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The two read endpoints of the pricing service.
///
/// Both return the raw XML body; interpreting it is the validator's job.
#[allow(async_fn_in_trait)]
pub trait PricingService {
    /// Product info (name) lookup for `id`.
    async fn product_info(&self, id: CandidateId) -> Result<String, ScrapeError>;

    /// Price lookup for `id` on the configured inspection date.
    async fn product_price(&self, id: CandidateId) -> Result<String, ScrapeError>;
}

/// HTTP client for the product price information service.
pub struct PricingClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    inspect_day: String,
}

impl PricingClient {
    /// Create a client. Fails when no service key is configured.
    pub fn new(creds: &Credentials, settings: &Settings) -> Result<Self, ScrapeError> {
        let service_key = creds.require_service_key()?.to_string();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            service_key,
            inspect_day: settings.inspect_day.clone(),
        })
    }

    async fn get_text(&self, url: String) -> Result<String, ScrapeError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::from_status(SERVICE, status));
        }
        Ok(resp.text().await?)
    }
}

// Service keys are issued already percent-encoded, so they are spliced into
// the URL verbatim instead of going through `RequestBuilder::query`.
impl PricingService for PricingClient {
    async fn product_info(&self, id: CandidateId) -> Result<String, ScrapeError> {
        log::debug!("Name lookup for id {}", id);
        self.get_text(format!(
            "{}/getProductInfoSvc.do?goodId={}&ServiceKey={}",
            self.base_url, id, self.service_key
        ))
        .await
    }

    async fn product_price(&self, id: CandidateId) -> Result<String, ScrapeError> {
        log::debug!("Price lookup for id {} on {}", id, self.inspect_day);
        self.get_text(format!(
            "{}/getProductPriceInfoSvc.do?goodInspectDay={}&goodId={}&ServiceKey={}",
            self.base_url, self.inspect_day, id, self.service_key
        ))
        .await
    }
}
