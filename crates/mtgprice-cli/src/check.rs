//! `stores` and `check` command handlers.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use mtgprice_core::{
    parse_card_list, AppConfig, CheckReport, LookupOutcome, StoreRegistry, OUT_OF_STOCK,
};
use mtgprice_scraper::{Aggregator, HttpLookup};
use rust_decimal::Decimal;

fn load_registry(config: &AppConfig) -> anyhow::Result<StoreRegistry> {
    StoreRegistry::load(&config.stores_path).with_context(|| {
        format!(
            "failed to load store registry from {}",
            config.stores_path.display()
        )
    })
}

pub(crate) fn run_stores(config: &AppConfig) -> anyhow::Result<()> {
    let registry = load_registry(config)?;
    print!("{}", format_stores(&registry));
    Ok(())
}

/// Prices every card in `input` at `stores` (all stores when empty).
///
/// # Errors
///
/// Returns an error if the registry or card file cannot be read, or the
/// request is rejected (no cards, unknown store ids).
pub(crate) async fn run_check(
    config: &AppConfig,
    input: &Path,
    stores: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let registry = load_registry(config)?;
    let blob = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read card list {}", input.display()))?;
    let cards = parse_card_list(&blob);
    if cards.is_empty() {
        anyhow::bail!("no card names found in {}", input.display());
    }

    let stores = if stores.is_empty() {
        registry.ids().map(ToOwned::to_owned).collect()
    } else {
        stores
    };

    tracing::info!(cards = cards.len(), stores = stores.len(), "checking prices");

    let lookup = HttpLookup::from_config(config)?;
    let aggregator = Aggregator::new(Arc::new(registry), lookup, config.max_concurrent_lookups);
    let report = aggregator.check(&cards, &stores).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

pub(crate) fn format_stores(registry: &StoreRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<20}{:<30}FORMAT", "ID", "NAME");
    for store in registry.list() {
        let _ = writeln!(out, "{:<20}{:<30}{}", store.id, store.name, store.format);
    }
    out
}

fn format_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| "n/a".to_string(), |p| format!("${p:.2}"))
}

fn format_cell(outcome: &LookupOutcome) -> String {
    let price = format_price(outcome.price);
    if outcome.availability == OUT_OF_STOCK {
        format!("{price} (oos)")
    } else {
        price
    }
}

/// Renders the report as an aligned table followed by per-store totals.
pub(crate) fn format_report(report: &CheckReport) -> String {
    let card_width = report
        .rows
        .iter()
        .map(|r| r.card_name.len())
        .max()
        .unwrap_or(0)
        .max(4)
        + 2;
    let column_width = report
        .selected_stores
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(14)
        + 2;

    let mut out = String::new();
    let _ = write!(out, "{:<card_width$}", "CARD");
    for id in &report.selected_stores {
        let _ = write!(out, "{id:<column_width$}");
    }
    let _ = writeln!(out, "{:<12}STORE", "LOWEST");

    for row in &report.rows {
        let _ = write!(out, "{:<card_width$}", row.card_name);
        for outcome in &row.outcomes {
            let _ = write!(out, "{:<column_width$}", format_cell(outcome));
        }
        let _ = writeln!(
            out,
            "{:<12}{}",
            format_price(row.lowest_price),
            row.lowest_price_store.as_deref().unwrap_or("n/a")
        );
    }

    let summary = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Cards: {}", summary.total_cards);
    for id in &report.selected_stores {
        let Some(stats) = summary.store_stats.get(id) else {
            continue;
        };
        let _ = writeln!(
            out,
            "  {}: {}/{} priced, total ${:.2}",
            stats.name, stats.available, summary.total_cards, stats.total_price
        );
    }
    let _ = writeln!(out, "Lowest total: ${:.2}", summary.overall_lowest_total);
    if summary.unpriced_cards > 0 {
        let _ = writeln!(out, "Unpriced cards: {}", summary.unpriced_cards);
    }
    out
}
