//! Normalized price-check records shared by the scraper, server, and CLI.
//!
//! Absence of a price is always `None`, never a missing field. On the wire the
//! absent price (and absent lowest-price store) serialize as the string
//! `"n/a"`, which is what the browser frontend renders.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

pub const AVAILABLE: &str = "Available";
pub const OUT_OF_STOCK: &str = "Out of Stock";
pub const NOT_AVAILABLE: &str = "n/a";

/// Result of one (card, store) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    pub store_id: String,
    #[serde(serialize_with = "serialize_price_or_na")]
    pub price: Option<Decimal>,
    pub availability: String,
}

impl LookupOutcome {
    #[must_use]
    pub fn available(store_id: impl Into<String>, price: Decimal) -> Self {
        Self {
            store_id: store_id.into(),
            price: Some(price),
            availability: AVAILABLE.to_string(),
        }
    }

    #[must_use]
    pub fn out_of_stock(store_id: impl Into<String>, price: Decimal) -> Self {
        Self {
            store_id: store_id.into(),
            price: Some(price),
            availability: OUT_OF_STOCK.to_string(),
        }
    }

    /// The sentinel outcome: no price, availability `"n/a"`.
    #[must_use]
    pub fn unavailable(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            price: None,
            availability: NOT_AVAILABLE.to_string(),
        }
    }

    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }
}

/// One requested card with its per-store outcomes in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRow {
    pub card_name: String,
    pub outcomes: Vec<LookupOutcome>,
    #[serde(serialize_with = "serialize_price_or_na")]
    pub lowest_price: Option<Decimal>,
    #[serde(serialize_with = "serialize_str_or_na")]
    pub lowest_price_store: Option<String>,
}

impl CardRow {
    /// Folds per-store outcomes into a row.
    ///
    /// The lowest price is the minimum over outcomes that carry a price; ties
    /// go to the earliest outcome, so callers must pass outcomes in the
    /// caller's store order.
    #[must_use]
    pub fn from_outcomes(card_name: impl Into<String>, outcomes: Vec<LookupOutcome>) -> Self {
        let lowest = outcomes
            .iter()
            .filter_map(|o| o.price.map(|p| (p, o.store_id.as_str())))
            .fold(None::<(Decimal, &str)>, |best, (price, store)| match best {
                Some((best_price, _)) if best_price <= price => best,
                _ => Some((price, store)),
            });

        let (lowest_price, lowest_price_store) = match lowest {
            Some((price, store)) => (Some(price), Some(store.to_string())),
            None => (None, None),
        };

        Self {
            card_name: card_name.into(),
            outcomes,
            lowest_price,
            lowest_price_store,
        }
    }

    #[must_use]
    pub fn outcome(&self, store_id: &str) -> Option<&LookupOutcome> {
        self.outcomes.iter().find(|o| o.store_id == store_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub name: String,
    /// Number of rows where this store returned a price.
    pub available: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_cards: usize,
    pub store_stats: BTreeMap<String, StoreStats>,
    /// Sum of every row's lowest price. Rows without any price add zero.
    #[serde(with = "rust_decimal::serde::float")]
    pub overall_lowest_total: Decimal,
    /// Rows that contributed nothing to `overall_lowest_total`.
    pub unpriced_cards: usize,
}

impl Summary {
    /// Folds rows into global statistics. `stores` lists `(id, display name)`
    /// for every requested store so stores with no prices still get an entry.
    #[must_use]
    pub fn from_rows<'a, I>(rows: &[CardRow], stores: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut store_stats: BTreeMap<String, StoreStats> = stores
            .into_iter()
            .map(|(id, name)| {
                (
                    id.to_string(),
                    StoreStats {
                        name: name.to_string(),
                        available: 0,
                        total_price: Decimal::ZERO,
                    },
                )
            })
            .collect();

        let mut overall_lowest_total = Decimal::ZERO;
        let mut unpriced_cards = 0usize;

        for row in rows {
            for outcome in &row.outcomes {
                let Some(price) = outcome.price else {
                    continue;
                };
                if let Some(stats) = store_stats.get_mut(&outcome.store_id) {
                    stats.available += 1;
                    stats.total_price += price;
                }
            }

            match row.lowest_price {
                Some(price) => overall_lowest_total += price,
                None => unpriced_cards += 1,
            }
        }

        Self {
            total_cards: rows.len(),
            store_stats,
            overall_lowest_total,
            unpriced_cards,
        }
    }
}

/// Complete result of one price check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub rows: Vec<CardRow>,
    pub summary: Summary,
    pub selected_stores: Vec<String>,
}

/// Serializes a price as a JSON number, or `"n/a"` when absent.
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::ref_option)] // serialize_with hands us `&Option<T>`
pub fn serialize_price_or_na<S>(price: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match price {
        Some(p) => rust_decimal::serde::float::serialize(p, serializer),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

#[allow(clippy::ref_option)] // serialize_with hands us `&Option<T>`
fn serialize_str_or_na<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
}
