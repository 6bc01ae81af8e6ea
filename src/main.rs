//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; cart rules live in CartService, queries in the domain.

use course_cart::adapters::catalog::CatalogJson;
use course_cart::adapters::identity::LocalIdentity;
use course_cart::adapters::persistence::{JsonFileStorage, MemoryStorage};
use course_cart::adapters::ui::tui::TuiInputPort;
use course_cart::ports::{CatalogPort, IdentityPort, InputPort, StoragePort};
use course_cart::shared::config::AppConfig;
use course_cart::usecases::CartService;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found (check CWD)"),
    }

    course_cart::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config could not be loaded, using defaults");
        AppConfig::default()
    });

    // --- Catalog: loaded once, shared read-only ---
    let catalog_path = cfg.catalog_path_or_default();
    let catalog_source: Arc<dyn CatalogPort> = Arc::new(CatalogJson::new(&catalog_path));
    let catalog = Arc::new(
        catalog_source
            .load_catalog()
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?,
    );

    // --- Cart storage ---
    let storage: Arc<dyn StoragePort> = if cfg.is_ephemeral() {
        info!("ephemeral mode: cart is kept in memory only");
        Arc::new(MemoryStorage::new())
    } else {
        let data_dir = cfg.data_dir_or_default();
        info!(path = %data_dir.display(), "cart storage directory");
        Arc::new(JsonFileStorage::new(data_dir))
    };

    // --- Services ---
    let cart = Arc::new(
        CartService::load(Arc::clone(&catalog), storage, cfg.cart_key_or_default()).await,
    );
    let identity: Arc<dyn IdentityPort> = Arc::new(LocalIdentity::new());

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&catalog),
        Arc::clone(&cart),
        identity,
        cfg.currency_symbol_or_default(),
    ));

    // --- Run (main menu -> Browse / Cart / Account) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if let Some(err) = cart.last_persist_error().await {
        warn!(error = %err, "exiting with unsaved cart changes");
    }
    Ok(())
}
