//! Turning a product name into an image URL.
//!
//! Resolution is a chain: the search-backed primary resolver may come up
//! empty, in which case a placeholder URL built from the name always works.

use std::sync::LazyLock;

use pricecat_core::{ResolvedImage, fallback_token, strip_qualifiers};
use reqwest::Url;

use crate::search::{ImageSearch, SearchBreadth};

const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/500x500.jpg";

/// Primary resolver backed by an [`ImageSearch`].
pub struct ImageResolver<S> {
    search: S,
    breadth: SearchBreadth,
}

impl<S: ImageSearch> ImageResolver<S> {
    pub fn new(search: S, breadth: SearchBreadth) -> Self {
        Self { search, breadth }
    }

    pub fn breadth(&self) -> &SearchBreadth {
        &self.breadth
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    /// First search hit for `name`, or `None` when search has nothing usable.
    ///
    /// Search faults are logged and treated as "no result" so the caller
    /// moves on to the fallback.
    pub async fn resolve_primary(&self, name: &str) -> Option<ResolvedImage> {
        let query = self.query_for(name);
        log::debug!("Image search for {:?}", query);
        match self.search.search(&query, &self.breadth).await {
            Ok(links) => {
                let first = links.into_iter().next();
                if first.is_none() {
                    log::debug!("No search results for {:?}", query);
                }
                first.map(ResolvedImage::primary)
            }
            Err(e) => {
                log::warn!("Image search failed for {:?}: {}", query, e);
                None
            }
        }
    }

    /// The search query for a product name: the name without package
    /// qualifiers such as `(500g)`, or the trimmed raw name if nothing else
    /// is left.
    pub fn query_for(&self, name: &str) -> String {
        let stripped = strip_qualifiers(name);
        if stripped.is_empty() {
            name.trim().to_string()
        } else {
            stripped
        }
    }
}

/// Placeholder image URL for a product name. Always succeeds.
pub fn resolve_fallback(name: &str) -> ResolvedImage {
    ResolvedImage::fallback(placeholder_url(&fallback_token(name)))
}

static PLACEHOLDER_BASE_URL: LazyLock<Option<Url>> =
    LazyLock::new(|| Url::parse(PLACEHOLDER_BASE).ok());

/// Placeholder URL carrying `token` as its (percent-encoded) caption.
pub fn placeholder_url(token: &str) -> String {
    match PLACEHOLDER_BASE_URL.as_ref() {
        Some(base) => {
            let mut url = base.clone();
            url.query_pairs_mut().append_pair("text", token);
            url.to_string()
        }
        None => PLACEHOLDER_BASE.to_string(),
    }
}
