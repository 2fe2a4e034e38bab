//! Store adapters: one normalization strategy per response-format tag.
//!
//! Adapter selection is a pure function of [`FormatTag`]. Unknown tags never
//! reach this point because the registry rejects them at load time.

mod conductcommerce;
mod tcgplayer_pro;

use mtgprice_core::{FormatTag, LookupOutcome, StoreProfile};

use crate::client::{RequestSpec, StoreClient};
use crate::error::ScraperError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAdapter {
    /// Search for product ids, then fetch SKU-level inventory for the first one.
    SearchThenInventory,
    /// One search call whose listings embed price and stock per variant.
    SingleCall,
}

impl StoreAdapter {
    #[must_use]
    pub fn for_format(format: FormatTag) -> Self {
        match format {
            FormatTag::TcgplayerPro => StoreAdapter::SearchThenInventory,
            FormatTag::Conductcommerce => StoreAdapter::SingleCall,
        }
    }

    /// Maximum number of outbound calls one lookup makes.
    #[must_use]
    pub fn request_count(self) -> u32 {
        match self {
            StoreAdapter::SearchThenInventory => 2,
            StoreAdapter::SingleCall => 1,
        }
    }

    /// The first (search) request for `card_name`.
    #[must_use]
    pub fn search_request(self, card_name: &str, profile: &StoreProfile) -> RequestSpec {
        RequestSpec::post_json(
            profile.search_url.clone(),
            profile.render_search_payload(card_name),
        )
        .with_headers(&profile.headers)
    }

    /// The inventory request for a product id found by the search call.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingInventoryEndpoint`] when the profile has
    /// no inventory URL.
    pub fn inventory_request(
        self,
        profile: &StoreProfile,
        product_id: &str,
    ) -> Result<RequestSpec, ScraperError> {
        tcgplayer_pro::inventory_request(profile, product_id)
    }

    /// Runs the adapter's request sequence and normalizes the responses.
    ///
    /// "Not found" style results are `Ok` with the unavailable outcome;
    /// `Err` is reserved for transport and protocol failures.
    ///
    /// # Errors
    ///
    /// Propagates any [`ScraperError`] from the underlying requests.
    pub async fn fetch(
        self,
        client: &StoreClient,
        card_name: &str,
        profile: &StoreProfile,
    ) -> Result<LookupOutcome, ScraperError> {
        let search = client
            .send_json(&self.search_request(card_name, profile))
            .await?;

        match self {
            StoreAdapter::SingleCall => Ok(conductcommerce::normalize_listings(
                &profile.id,
                card_name,
                &search,
            )),
            StoreAdapter::SearchThenInventory => {
                let product_ids = tcgplayer_pro::parse_product_ids(&search);
                let Some(product_id) = product_ids.first() else {
                    tracing::debug!(store = %profile.id, card = card_name, "search returned no products");
                    return Ok(LookupOutcome::unavailable(&profile.id));
                };

                let inventory = client
                    .send_json(&self.inventory_request(profile, product_id)?)
                    .await?;
                Ok(tcgplayer_pro::normalize_inventory(
                    &profile.id,
                    product_id,
                    &inventory,
                ))
            }
        }
    }
}
