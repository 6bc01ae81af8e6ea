//! Application configuration. Data paths, storage key, display currency.

use crate::usecases::DEFAULT_CART_KEY;
use serde::Deserialize;
use std::path::PathBuf;

/// Default directory for the catalog file and persisted cart.
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Directory holding `courses.json` and the cart file. Read from STOREFRONT_DATA_DIR.
    pub data_dir: Option<String>,

    /// Catalog JSON file. Defaults to `<data_dir>/courses.json`. Read from STOREFRONT_CATALOG_PATH.
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Storage key the cart is written under. Read from STOREFRONT_CART_KEY.
    #[serde(default)]
    pub cart_key: Option<String>,

    /// Symbol prefixed to prices in the UI. Read from STOREFRONT_CURRENCY_SYMBOL.
    #[serde(default)]
    pub currency_symbol: Option<String>,

    /// Keep the cart in memory only (nothing written to disk). Read from STOREFRONT_EPHEMERAL.
    #[serde(default)]
    pub ephemeral: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("STOREFRONT"));
        if let Ok(path) = std::env::var("STOREFRONT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn catalog_path_or_default(&self) -> PathBuf {
        self.catalog_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("courses.json"))
    }

    pub fn cart_key_or_default(&self) -> String {
        self.cart_key
            .clone()
            .unwrap_or_else(|| DEFAULT_CART_KEY.to_string())
    }

    pub fn currency_symbol_or_default(&self) -> String {
        self.currency_symbol
            .clone()
            .unwrap_or_else(|| "₹".to_string())
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral.unwrap_or(false)
    }
}
