//! Lookup executor: one (card, store) pair in, one [`LookupOutcome`] out.

use std::future::Future;
use std::time::Duration;

use mtgprice_core::{AppConfig, LookupOutcome, StoreProfile};

use crate::client::StoreClient;
use crate::error::ScraperError;
use crate::formats::StoreAdapter;

/// Anything that can price one card at one store.
///
/// Implementations never fail: every error is absorbed into the unavailable
/// outcome so a single bad store cannot abort a whole check.
pub trait PriceLookup: Send + Sync {
    fn lookup(
        &self,
        card_name: &str,
        profile: &StoreProfile,
    ) -> impl Future<Output = LookupOutcome> + Send;
}

/// [`PriceLookup`] backed by live HTTP calls to the store's endpoints.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: StoreClient,
    timeout: Duration,
}

impl HttpLookup {
    /// `timeout` bounds each outbound request; a two-call lookup may take up
    /// to twice as long before it is abandoned.
    #[must_use]
    pub fn new(client: StoreClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let timeout = Duration::from_secs(config.lookup_timeout_secs);
        let client = StoreClient::new(timeout, &config.user_agent)?;
        Ok(Self::new(client, timeout))
    }
}

impl PriceLookup for HttpLookup {
    async fn lookup(&self, card_name: &str, profile: &StoreProfile) -> LookupOutcome {
        let adapter = StoreAdapter::for_format(profile.format);
        let budget = self.timeout * adapter.request_count();

        match tokio::time::timeout(budget, adapter.fetch(&self.client, card_name, profile))
            .await
        {
            Ok(Ok(outcome)) => {
                tracing::debug!(
                    store = %profile.id,
                    card = card_name,
                    price = ?outcome.price,
                    availability = %outcome.availability,
                    "lookup complete"
                );
                outcome
            }
            Ok(Err(e)) => {
                tracing::warn!(store = %profile.id, card = card_name, error = %e, "lookup failed");
                LookupOutcome::unavailable(&profile.id)
            }
            Err(_) => {
                tracing::warn!(
                    store = %profile.id,
                    card = card_name,
                    budget = ?budget,
                    "lookup timed out"
                );
                LookupOutcome::unavailable(&profile.id)
            }
        }
    }
}
