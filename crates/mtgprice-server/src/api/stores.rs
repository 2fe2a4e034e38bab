use axum::{extract::State, response::IntoResponse, Json};
use mtgprice_core::StoreSummary;
use mtgprice_scraper::PriceLookup;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    key: String,
    name: String,
    #[serde(rename = "type")]
    format: &'static str,
}

impl From<StoreSummary> for StoreItem {
    fn from(summary: StoreSummary) -> Self {
        Self {
            key: summary.id,
            name: summary.name,
            format: summary.format.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StoresResponse {
    success: bool,
    stores: Vec<StoreItem>,
}

pub(super) async fn list_stores<L: PriceLookup + 'static>(
    State(state): State<AppState<L>>,
) -> impl IntoResponse {
    let stores = state
        .aggregator
        .list_stores()
        .into_iter()
        .map(StoreItem::from)
        .collect();

    Json(StoresResponse {
        success: true,
        stores,
    })
}
