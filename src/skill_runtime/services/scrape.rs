//! Rate-limited page scraping.

use crate::skill_runtime::{
    domain::{FixedWindowLimiter, ScrapeInputError, ScrapePlan, ScrapeRequest, ScrapeResult},
    ports::{OutboundError, PageFetcher},
};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Requests allowed per client per window.
pub const SCRAPE_LIMIT: u32 = 10;
/// Window length.
pub const SCRAPE_WINDOW_SECONDS: i64 = 60;

/// Scrape failures.
#[derive(Debug, Clone, Error)]
pub enum ScrapeServiceError {
    /// Request failed validation.
    #[error(transparent)]
    Input(#[from] ScrapeInputError),
    /// Client exceeded its window.
    #[error("Rate limit exceeded. Maximum 10 requests per minute.")]
    RateLimited,
    /// The page answered with a non-success status.
    #[error("Failed to fetch URL: {status} {reason}")]
    Upstream {
        /// Status code to relay.
        status: u16,
        /// Reason phrase.
        reason: String,
    },
    /// The page could not be fetched.
    #[error(transparent)]
    Outbound(#[from] OutboundError),
}

/// Fetches pages and extracts data, limiting each client to
/// [`SCRAPE_LIMIT`] requests per minute.
pub struct ScrapeService<F, C>
where
    F: PageFetcher + ?Sized,
    C: Clock + Send + Sync,
{
    fetcher: Arc<F>,
    limiter: Arc<FixedWindowLimiter<C>>,
}

impl<F, C> Clone for ScrapeService<F, C>
where
    F: PageFetcher + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            limiter: Arc::clone(&self.limiter),
        }
    }
}

impl<F, C> ScrapeService<F, C>
where
    F: PageFetcher + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates the service with the standard per-client limit.
    #[must_use]
    pub fn new(fetcher: Arc<F>, clock: Arc<C>) -> Self {
        Self {
            fetcher,
            limiter: Arc::new(FixedWindowLimiter::new(
                SCRAPE_LIMIT,
                Duration::seconds(SCRAPE_WINDOW_SECONDS),
                clock,
            )),
        }
    }

    /// Scrapes a page on behalf of `client`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeServiceError::Input`] for invalid requests,
    /// [`ScrapeServiceError::RateLimited`] past the limit,
    /// [`ScrapeServiceError::Upstream`] for non-2xx pages and
    /// [`ScrapeServiceError::Outbound`] when the fetch fails.
    pub async fn scrape(
        &self,
        client: &str,
        request: ScrapeRequest,
    ) -> Result<ScrapeResult, ScrapeServiceError> {
        let plan = ScrapePlan::new(request)?;
        if !self.limiter.try_acquire(client) {
            tracing::info!(%client, "scrape rate limit exceeded");
            return Err(ScrapeServiceError::RateLimited);
        }

        let page = self.fetcher.fetch(plan.url(), plan.headers()).await?;
        if !page.is_success() {
            return Err(ScrapeServiceError::Upstream {
                status: page.status,
                reason: page.reason,
            });
        }
        let result = plan.extract(&page.body);
        tracing::info!(url = %plan.url(), count = result.count, "page scraped");
        Ok(result)
    }
}
