//! Aggregator: validates a check request, fans out every (card, store) pair
//! through a bounded pool, and folds the outcomes into a [`CheckReport`].

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use mtgprice_core::{
    CardRow, CheckReport, LookupOutcome, StoreProfile, StoreRegistry, StoreSummary, Summary,
};

use crate::lookup::PriceLookup;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid stores: {}", .ids.join(", "))]
    UnknownStore { ids: Vec<String> },
}

pub struct Aggregator<L> {
    registry: Arc<StoreRegistry>,
    lookup: L,
    max_concurrent: usize,
}

impl<L: PriceLookup> Aggregator<L> {
    /// `max_concurrent` of zero is treated as one.
    #[must_use]
    pub fn new(registry: Arc<StoreRegistry>, lookup: L, max_concurrent: usize) -> Self {
        Self {
            registry,
            lookup,
            max_concurrent: max_concurrent.max(1),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    #[must_use]
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    #[must_use]
    pub fn list_stores(&self) -> Vec<StoreSummary> {
        self.registry.list()
    }

    /// Prices every card at every requested store.
    ///
    /// Card names are trimmed and blank entries dropped. Rows keep the input
    /// card order and each row's outcomes keep the requested store order,
    /// regardless of the order in which lookups complete.
    ///
    /// # Errors
    ///
    /// - [`CheckError::InvalidInput`] if no usable card name or no store id
    ///   was given.
    /// - [`CheckError::UnknownStore`] listing every id the registry does not
    ///   know. No lookup is issued in either case.
    pub async fn check(
        &self,
        card_names: &[String],
        store_ids: &[String],
    ) -> Result<CheckReport, CheckError> {
        let (cards, profiles) = self.validate(card_names, store_ids)?;

        tracing::info!(
            cards = cards.len(),
            stores = profiles.len(),
            max_concurrent = self.max_concurrent,
            "starting price check"
        );

        let width = profiles.len();
        let (cards_ref, profiles_ref) = (&cards, &profiles);
        let pairs = (0..cards.len()).flat_map(|ci| (0..width).map(move |si| (ci, si)));

        let results: Vec<(usize, usize, LookupOutcome)> = stream::iter(pairs)
            .map(|(ci, si)| async move {
                let outcome = self
                    .lookup
                    .lookup(cards_ref[ci], profiles_ref[si])
                    .await;
                (ci, si, outcome)
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut slots: Vec<Option<LookupOutcome>> = vec![None; cards.len() * width];
        for (ci, si, outcome) in results {
            slots[ci * width + si] = Some(outcome);
        }

        let mut slots = slots.into_iter();
        let mut rows: Vec<CardRow> = Vec::with_capacity(cards.len());
        for card in &cards {
            let outcomes = profiles
                .iter()
                .zip(slots.by_ref().take(width))
                .map(|(profile, slot)| {
                    slot.unwrap_or_else(|| LookupOutcome::unavailable(&profile.id))
                })
                .collect();
            rows.push(CardRow::from_outcomes(*card, outcomes));
        }

        let summary = Summary::from_rows(
            &rows,
            profiles.iter().map(|p| (p.id.as_str(), p.name.as_str())),
        );

        tracing::info!(
            cards = summary.total_cards,
            unpriced = summary.unpriced_cards,
            "price check complete"
        );

        Ok(CheckReport {
            rows,
            summary,
            selected_stores: profiles.iter().map(|p| p.id.clone()).collect(),
        })
    }

    fn validate<'a>(
        &'a self,
        card_names: &'a [String],
        store_ids: &[String],
    ) -> Result<(Vec<&'a str>, Vec<&'a StoreProfile>), CheckError> {
        if card_names.is_empty() {
            return Err(CheckError::InvalidInput("No cards provided".to_string()));
        }
        let cards: Vec<&str> = card_names
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if cards.is_empty() {
            return Err(CheckError::InvalidInput(
                "No valid card names found".to_string(),
            ));
        }

        if store_ids.is_empty() {
            return Err(CheckError::InvalidInput("No stores selected".to_string()));
        }

        let mut unknown: Vec<String> = Vec::new();
        for id in store_ids {
            if !self.registry.contains(id) && !unknown.contains(id) {
                unknown.push(id.clone());
            }
        }
        if !unknown.is_empty() {
            return Err(CheckError::UnknownStore { ids: unknown });
        }

        let mut profiles: Vec<&StoreProfile> = Vec::with_capacity(store_ids.len());
        for profile in store_ids
            .iter()
            .filter_map(|id| self.registry.resolve(id).ok())
        {
            if !profiles.iter().any(|p| p.id == profile.id) {
                profiles.push(profile);
            }
        }

        Ok((cards, profiles))
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
