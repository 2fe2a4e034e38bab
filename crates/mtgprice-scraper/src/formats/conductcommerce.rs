//! `ConductCommerce` storefronts: one search call with embedded variants.
//!
//! Response: `{"result": {"listings": [{"name": "Sol Ring", "variants":
//! [{"price": "2.50", "quantity": 3}]}]}}`.

use mtgprice_core::LookupOutcome;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::value::{array_at, parse_price, parse_quantity};

fn listing_name(listing: &Value) -> Option<&str> {
    listing
        .get("name")
        .or_else(|| listing.get("title"))
        .and_then(Value::as_str)
        .map(str::trim)
}

/// Normalizes a search response for `card_name`.
///
/// Listings whose name equals the card case-insensitively win; without any
/// exact match only the first listing is considered. The cheapest priced
/// variant decides price and availability (in-stock preferred on a tie).
pub(super) fn normalize_listings(
    store_id: &str,
    card_name: &str,
    response: &Value,
) -> LookupOutcome {
    let listings = match array_at(response, &["result", "listings"]) {
        [] => array_at(response, &["listings"]),
        found => found,
    };

    let wanted = card_name.trim().to_lowercase();
    let exact: Vec<&Value> = listings
        .iter()
        .filter(|l| listing_name(l).is_some_and(|n| n.to_lowercase() == wanted))
        .collect();

    let chosen: Vec<&Value> = if exact.is_empty() {
        listings.first().into_iter().collect()
    } else {
        exact
    };

    let best = chosen
        .into_iter()
        .flat_map(|listing| array_at(listing, &["variants"]))
        .filter_map(|variant| {
            let price: Decimal = variant.get("price").and_then(parse_price)?;
            let in_stock = parse_quantity(variant.get("quantity")) > 0;
            Some((price, in_stock))
        })
        .min_by_key(|(price, in_stock)| (*price, !*in_stock));

    match best {
        Some((price, true)) => LookupOutcome::available(store_id, price),
        Some((price, false)) => LookupOutcome::out_of_stock(store_id, price),
        None => LookupOutcome::unavailable(store_id),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use mtgprice_core::{AVAILABLE, OUT_OF_STOCK};
    use serde_json::json;

    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn exact_name_match_is_preferred_over_first_result() {
        let response = json!({"result": {"listings": [
            {"name": "Sol Ring (Commander Legends)", "variants": [{"price": 1.00, "quantity": 9}]},
            {"name": "sol ring", "variants": [
                {"price": "3.00", "quantity": 1},
                {"price": "2.50", "quantity": 2}
            ]}
        ]}});
        let outcome = normalize_listings("a", "Sol Ring", &response);
        assert_eq!(outcome.price, Some(d("2.50")));
        assert_eq!(outcome.availability, AVAILABLE);
    }

    #[test]
    fn falls_back_to_first_listing_without_exact_match() {
        let response = json!({"result": {"listings": [
            {"name": "Sol Ring Token", "variants": [{"price": 0.40, "quantity": 2}]},
            {"name": "Sol Ring Art Card", "variants": [{"price": 0.10, "quantity": 2}]}
        ]}});
        let outcome = normalize_listings("a", "Sol Ring", &response);
        assert_eq!(outcome.price, Some(d("0.40")));
    }

    #[test]
    fn zero_quantity_is_out_of_stock() {
        let response = json!({"result": {"listings": [
            {"name": "Sol Ring", "variants": [{"price": 2.00, "quantity": 0}]}
        ]}});
        let outcome = normalize_listings("a", "Sol Ring", &response);
        assert_eq!(outcome.price, Some(d("2.00")));
        assert_eq!(outcome.availability, OUT_OF_STOCK);
    }

    #[test]
    fn tie_prefers_in_stock_variant() {
        let response = json!({"result": {"listings": [
            {"name": "Sol Ring", "variants": [
                {"price": 2.00, "quantity": 0},
                {"price": "2.00", "quantity": 3}
            ]}
        ]}});
        let outcome = normalize_listings("a", "Sol Ring", &response);
        assert_eq!(outcome.availability, AVAILABLE);
    }

    #[test]
    fn empty_or_missing_listings_are_unavailable() {
        for response in [
            json!({"result": {"listings": []}}),
            json!({"result": {}}),
            json!({}),
            json!(null),
        ] {
            let outcome = normalize_listings("a", "Sol Ring", &response);
            assert_eq!(outcome, LookupOutcome::unavailable("a"));
        }
    }

    #[test]
    fn listing_without_priced_variants_is_unavailable() {
        let response = json!({"result": {"listings": [
            {"name": "Sol Ring", "variants": [{"price": "TBD", "quantity": 2}]},
            {"name": "Sol Ring", "variants": []}
        ]}});
        let outcome = normalize_listings("a", "Sol Ring", &response);
        assert_eq!(outcome, LookupOutcome::unavailable("a"));
    }

    #[test]
    fn accepts_top_level_listings_and_title_field() {
        let response = json!({"listings": [
            {"title": "Lightning Bolt", "variants": [{"price": 1.25, "quantity": 1}]}
        ]});
        let outcome = normalize_listings("a", "lightning bolt", &response);
        assert_eq!(outcome.price, Some(d("1.25")));
    }
}
