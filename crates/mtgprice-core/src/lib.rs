pub mod app_config;
pub mod cards;
pub mod config;
pub mod error;
pub mod pricing;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use cards::{parse_card_list, strip_quantity};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, UnknownStoreError};
pub use pricing::{
    CardRow, CheckReport, LookupOutcome, StoreStats, Summary, AVAILABLE, NOT_AVAILABLE,
    OUT_OF_STOCK,
};
pub use stores::{FormatTag, StoreProfile, StoreRegistry, StoreSummary, CARD_NAME_PLACEHOLDER};
