//! Two-stage validation of a single candidate id.

use pricecat_core::{CandidateId, ValidationOutcome};

use crate::error::ScrapeError;
use crate::pricing::PricingService;
use crate::xml::extract_text;

const NAME_PATH: &[&str] = &["result", "item", "goodName"];
const PRICE_PATH: &[&str] = &["result", "iros.openapi.service.vo.goodPriceVO", "goodPrice"];

/// Classifies candidate ids as valid, invalid or errored.
pub struct RecordValidator<S> {
    service: S,
}

impl<S: PricingService> RecordValidator<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Validate one id. Never fails: transport and parse faults become
    /// [`ValidationOutcome::Errored`].
    pub async fn validate(&self, id: CandidateId) -> ValidationOutcome {
        match self.lookup(id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("ID {} - error: {}", id, e);
                ValidationOutcome::Errored {
                    id,
                    message: e.to_string(),
                }
            }
        }
    }

    async fn lookup(&self, id: CandidateId) -> Result<ValidationOutcome, ScrapeError> {
        let body = self.service.product_info(id).await?;
        let name = extract_text(&body, NAME_PATH)?
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let Some(name) = name else {
            log::info!("ID {} - no product name", id);
            return Ok(ValidationOutcome::Invalid { id });
        };
        log::debug!("ID {} - name: {}", id, name);

        let body = self.service.product_price(id).await?;
        let Some(raw_price) = extract_text(&body, PRICE_PATH)? else {
            log::info!("ID {} - no price (name: {})", id, name);
            return Ok(ValidationOutcome::Invalid { id });
        };
        let Some(price) = parse_price(&raw_price) else {
            log::info!("ID {} - unusable price {:?} (name: {})", id, raw_price, name);
            return Ok(ValidationOutcome::Invalid { id });
        };

        log::info!("ID {} - valid (name: {}, price: {})", id, name, price);
        Ok(ValidationOutcome::Valid { id, name, price })
    }
}

/// Parse a price field. Anything other than a positive integer is unusable.
pub fn parse_price(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|p| *p > 0)
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
