use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use mtgprice_core::{parse_card_list, CardRow, Summary};
use mtgprice_scraper::PriceLookup;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct CheckRequest {
    /// Newline-separated card list, optionally with `4x`-style quantities.
    #[serde(default)]
    cards: String,
    #[serde(default)]
    stores: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckResponse {
    success: bool,
    results: Vec<Map<String, Value>>,
    summary: Summary,
    selected_stores: Vec<String>,
}

pub(super) async fn check_prices<L: PriceLookup + 'static>(
    State(state): State<AppState<L>>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(request_id = %req_id.0, error = %e, "rejected check-prices body");
        ApiError::bad_request("Invalid JSON")
    })?;

    if request.cards.trim().is_empty() {
        return Err(ApiError::bad_request("No cards provided"));
    }
    let cards = parse_card_list(&request.cards);
    if cards.is_empty() {
        return Err(ApiError::bad_request("No valid card names found"));
    }

    let report = state
        .aggregator
        .check(&cards, &request.stores)
        .await
        .map_err(|e| {
            tracing::info!(request_id = %req_id.0, error = %e, "price check rejected");
            ApiError::from(e)
        })?;

    let results = report
        .rows
        .iter()
        .map(flatten_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "failed to serialize price rows");
            ApiError::internal("failed to serialize results")
        })?;

    Ok(Json(CheckResponse {
        success: true,
        results,
        summary: report.summary,
        selected_stores: report.selected_stores,
    }))
}

/// Flattens a row into the browser's table shape:
/// `{card_name, <id>_price, <id>_availability, lowest_price, lowest_price_store}`.
fn flatten_row(row: &CardRow) -> Result<Map<String, Value>, serde_json::Error> {
    let mut serialized = serde_json::to_value(row)?;

    let mut item = Map::new();
    item.insert("card_name".to_string(), Value::String(row.card_name.clone()));
    for outcome in &row.outcomes {
        let mut value = serde_json::to_value(outcome)?;
        item.insert(format!("{}_price", outcome.store_id), value["price"].take());
        item.insert(
            format!("{}_availability", outcome.store_id),
            Value::String(outcome.availability.clone()),
        );
    }
    item.insert("lowest_price".to_string(), serialized["lowest_price"].take());
    item.insert(
        "lowest_price_store".to_string(),
        serialized["lowest_price_store"].take(),
    );
    Ok(item)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use mtgprice_core::LookupOutcome;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn flatten_row_uses_store_prefixed_keys() {
        let row = CardRow::from_outcomes(
            "Sol Ring",
            vec![
                LookupOutcome::available("a", Decimal::from_str("2.50").unwrap()),
                LookupOutcome::unavailable("b"),
            ],
        );
        let item = flatten_row(&row).unwrap();
        assert_eq!(
            Value::Object(item),
            json!({
                "card_name": "Sol Ring",
                "a_price": 2.5,
                "a_availability": "Available",
                "b_price": "n/a",
                "b_availability": "n/a",
                "lowest_price": 2.5,
                "lowest_price_store": "a"
            })
        );
    }

    #[test]
    fn flatten_row_without_prices_is_all_sentinel() {
        let row = CardRow::from_outcomes("Nope", vec![LookupOutcome::unavailable("a")]);
        let item = flatten_row(&row).unwrap();
        assert_eq!(item["lowest_price"], json!("n/a"));
        assert_eq!(item["lowest_price_store"], json!("n/a"));
    }
}
