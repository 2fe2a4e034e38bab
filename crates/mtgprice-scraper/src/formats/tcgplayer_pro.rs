//! `TCGplayer Pro` storefronts: search, then SKU inventory.
//!
//! Search response: `{"products": {"items": [{"id": 1001, ...}]}}`.
//! Inventory response: `[{"productId": 1001, "skus": [{"price": 2.5, "quantity": 3}]}]`,
//! occasionally wrapped as `{"results": [...]}`.

use mtgprice_core::{LookupOutcome, StoreProfile};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::client::RequestSpec;
use crate::error::ScraperError;
use crate::value::{array_at, parse_price, parse_quantity, value_as_string};

pub(super) fn inventory_request(
    profile: &StoreProfile,
    product_id: &str,
) -> Result<RequestSpec, ScraperError> {
    let url = profile
        .inventory_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ScraperError::MissingInventoryEndpoint {
            store_id: profile.id.clone(),
        })?;

    Ok(RequestSpec::get(url)
        .with_headers(&profile.headers)
        .with_query("productIds", product_id))
}

/// Candidate product ids in search-result order, skipping items without one.
pub(super) fn parse_product_ids(response: &Value) -> Vec<String> {
    array_at(response, &["products", "items"])
        .iter()
        .filter_map(|item| item.get("id").and_then(value_as_string))
        .collect()
}

/// Picks the cheapest in-stock SKU of `product_id`; falls back to the cheapest
/// listed SKU as out of stock; no priced SKU at all yields the sentinel.
pub(super) fn normalize_inventory(
    store_id: &str,
    product_id: &str,
    response: &Value,
) -> LookupOutcome {
    let entries = match response {
        Value::Array(items) => items.as_slice(),
        other => array_at(other, &["results"]),
    };

    let skus = entries
        .iter()
        .filter(|entry| {
            entry
                .get("productId")
                .and_then(value_as_string)
                .is_none_or(|id| id == product_id)
        })
        .flat_map(|entry| array_at(entry, &["skus"]))
        .filter_map(|sku| {
            let price = sku.get("price").and_then(parse_price)?;
            Some((price, parse_quantity(sku.get("quantity"))))
        });

    let mut cheapest_in_stock: Option<Decimal> = None;
    let mut cheapest_listed: Option<Decimal> = None;
    for (price, quantity) in skus {
        cheapest_listed = Some(cheapest_listed.map_or(price, |p| p.min(price)));
        if quantity > 0 {
            cheapest_in_stock = Some(cheapest_in_stock.map_or(price, |p| p.min(price)));
        }
    }

    match (cheapest_in_stock, cheapest_listed) {
        (Some(price), _) => LookupOutcome::available(store_id, price),
        (None, Some(price)) => LookupOutcome::out_of_stock(store_id, price),
        (None, None) => LookupOutcome::unavailable(store_id),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use mtgprice_core::{AVAILABLE, NOT_AVAILABLE, OUT_OF_STOCK};
    use serde_json::json;

    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_product_ids_reads_numeric_and_string_ids() {
        let response = json!({"products": {"items": [
            {"id": 1001, "name": "Sol Ring"},
            {"name": "no id"},
            {"id": "1002"}
        ]}});
        assert_eq!(parse_product_ids(&response), vec!["1001", "1002"]);
    }

    #[test]
    fn parse_product_ids_tolerates_missing_structure() {
        assert!(parse_product_ids(&json!({})).is_empty());
        assert!(parse_product_ids(&json!({"products": {"items": []}})).is_empty());
        assert!(parse_product_ids(&json!([])).is_empty());
    }

    #[test]
    fn picks_cheapest_in_stock_sku() {
        let response = json!([{"productId": 1001, "skus": [
            {"price": 1.50, "quantity": 0},
            {"price": "2.75", "quantity": 1},
            {"price": 2.50, "quantity": 4}
        ]}]);
        let outcome = normalize_inventory("a", "1001", &response);
        assert_eq!(outcome.price, Some(d("2.50")));
        assert_eq!(outcome.availability, AVAILABLE);
        assert_eq!(outcome.store_id, "a");
    }

    #[test]
    fn falls_back_to_cheapest_listed_price_when_nothing_in_stock() {
        let response = json!([{"productId": 1001, "skus": [
            {"price": 3.00, "quantity": 0},
            {"price": 2.10}
        ]}]);
        let outcome = normalize_inventory("a", "1001", &response);
        assert_eq!(outcome.price, Some(d("2.10")));
        assert_eq!(outcome.availability, OUT_OF_STOCK);
    }

    #[test]
    fn empty_sku_list_is_unavailable() {
        let outcome = normalize_inventory("a", "1001", &json!([{"productId": 1001, "skus": []}]));
        assert_eq!(outcome.price, None);
        assert_eq!(outcome.availability, NOT_AVAILABLE);

        let outcome = normalize_inventory("a", "1001", &json!([]));
        assert_eq!(outcome.price, None);
    }

    #[test]
    fn unparsable_prices_are_skipped() {
        let response = json!([{"productId": 1001, "skus": [
            {"price": "call us", "quantity": 2},
            {"price": null, "quantity": 1}
        ]}]);
        let outcome = normalize_inventory("a", "1001", &response);
        assert_eq!(outcome, LookupOutcome::unavailable("a"));
    }

    #[test]
    fn ignores_skus_of_other_products() {
        let response = json!([
            {"productId": 9999, "skus": [{"price": 0.25, "quantity": 5}]},
            {"productId": "1001", "skus": [{"price": 2.00, "quantity": 1}]}
        ]);
        let outcome = normalize_inventory("a", "1001", &response);
        assert_eq!(outcome.price, Some(d("2.00")));
    }

    #[test]
    fn accepts_results_wrapper_and_missing_product_id() {
        let response = json!({"results": [{"skus": [{"price": 4, "quantity": 1}]}]});
        let outcome = normalize_inventory("a", "1001", &response);
        assert_eq!(outcome.price, Some(d("4")));
        assert_eq!(outcome.availability, AVAILABLE);
    }

    #[test]
    fn non_array_inventory_is_unavailable() {
        let outcome = normalize_inventory("a", "1001", &json!({"error": "bad"}));
        assert_eq!(outcome, LookupOutcome::unavailable("a"));
    }
}
