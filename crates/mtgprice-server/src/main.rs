mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use mtgprice_core::StoreRegistry;
use mtgprice_scraper::{Aggregator, HttpLookup};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = mtgprice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = StoreRegistry::load(&config.stores_path).with_context(|| {
        format!(
            "failed to load store registry from {}",
            config.stores_path.display()
        )
    })?;
    tracing::info!(
        stores = registry.len(),
        path = %config.stores_path.display(),
        "store registry loaded"
    );

    let lookup = HttpLookup::from_config(&config)?;
    let aggregator = Aggregator::new(Arc::new(registry), lookup, config.max_concurrent_lookups);
    let app = build_app(AppState {
        aggregator: Arc::new(aggregator),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
