//! Store registry: the static mapping of store identifier to connection
//! profile, loaded once at startup from a YAML (or JSON) file.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, UnknownStoreError};

/// Placeholder substituted with the requested card name inside the
/// `search_payload` template.
pub const CARD_NAME_PLACEHOLDER: &str = "{card_name}";

/// Response-format tag. Selects the adapter that normalizes a store's
/// search/inventory responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    /// Search call returns product ids; a second inventory call returns SKUs.
    TcgplayerPro,
    /// Single search call whose listings embed price and stock variants.
    Conductcommerce,
}

impl FormatTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::TcgplayerPro => "tcgplayer_pro",
            FormatTag::Conductcommerce => "conductcommerce",
        }
    }

    /// Whether this format needs the secondary inventory endpoint.
    #[must_use]
    pub fn requires_inventory(self) -> bool {
        matches!(self, FormatTag::TcgplayerPro)
    }

    /// Payload key that receives the card name when the template has no
    /// explicit placeholder.
    #[must_use]
    pub fn default_query_key(self) -> &'static str {
        match self {
            FormatTag::TcgplayerPro => "query",
            FormatTag::Conductcommerce => "name",
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProfile {
    pub id: String,
    pub name: String,
    pub format: FormatTag,
    pub search_url: String,
    #[serde(default)]
    pub inventory_url: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default = "empty_payload")]
    pub search_payload: serde_json::Value,
}

fn empty_payload() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl StoreProfile {
    /// Renders the search request body for `card_name`.
    ///
    /// Every string value containing [`CARD_NAME_PLACEHOLDER`] has the
    /// placeholder replaced. When the template contains no placeholder at all,
    /// the card name is written to the format's default query key instead.
    #[must_use]
    pub fn render_search_payload(&self, card_name: &str) -> serde_json::Value {
        let mut payload = self.search_payload.clone();
        if substitute_placeholder(&mut payload, card_name) {
            return payload;
        }

        if let serde_json::Value::Object(map) = &mut payload {
            map.insert(
                self.format.default_query_key().to_string(),
                serde_json::Value::String(card_name.to_string()),
            );
        }
        payload
    }
}

/// Replaces the placeholder in all nested string values. Returns `true` if at
/// least one replacement happened.
fn substitute_placeholder(value: &mut serde_json::Value, card_name: &str) -> bool {
    match value {
        serde_json::Value::String(s) if s.contains(CARD_NAME_PLACEHOLDER) => {
            *s = s.replace(CARD_NAME_PLACEHOLDER, card_name);
            true
        }
        serde_json::Value::Array(items) => substitute_all(items.iter_mut(), card_name),
        serde_json::Value::Object(map) => substitute_all(map.values_mut(), card_name),
        _ => false,
    }
}

/// Visits every value; does not stop at the first replacement.
fn substitute_all<'a>(
    values: impl Iterator<Item = &'a mut serde_json::Value>,
    card_name: &str,
) -> bool {
    let mut hit = false;
    for value in values {
        hit |= substitute_placeholder(value, card_name);
    }
    hit
}

/// Discovery view of a store, as served by `list_stores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub id: String,
    pub name: String,
    pub format: FormatTag,
}

#[derive(Debug, Deserialize)]
struct StoresFile {
    stores: Vec<StoreProfile>,
}

/// Immutable, validated set of store profiles in file order.
#[derive(Debug, Clone)]
pub struct StoreRegistry {
    stores: Vec<StoreProfile>,
}

impl StoreRegistry {
    /// Load and validate the store registry from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a registry from an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StoresFileParse` for malformed documents (including
    /// unknown format tags and missing required fields) and
    /// `ConfigError::Validation` for semantically invalid profiles.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: StoresFile = serde_yaml::from_str(content)?;
        validate_stores(&file.stores)?;
        Ok(Self {
            stores: file.stores,
        })
    }

    /// Build a registry from already-constructed profiles, applying the same
    /// validation as [`StoreRegistry::from_yaml_str`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any profile is invalid.
    pub fn from_profiles(stores: Vec<StoreProfile>) -> Result<Self, ConfigError> {
        validate_stores(&stores)?;
        Ok(Self { stores })
    }

    #[must_use]
    pub fn list(&self) -> Vec<StoreSummary> {
        self.stores
            .iter()
            .map(|s| StoreSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                format: s.format,
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`UnknownStoreError`] when no profile has the given id.
    pub fn resolve(&self, id: &str) -> Result<&StoreProfile, UnknownStoreError> {
        self.stores
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| UnknownStoreError(id.to_string()))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.stores.iter().any(|s| s.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.stores.iter().map(|s| s.id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

fn validate_stores(stores: &[StoreProfile]) -> Result<(), ConfigError> {
    if stores.is_empty() {
        return Err(ConfigError::Validation(
            "at least one store must be configured".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();

    for store in stores {
        if store.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store id must be non-empty".to_string(),
            ));
        }

        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty name",
                store.id
            )));
        }

        if store.search_url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty search_url",
                store.id
            )));
        }

        if store.format.requires_inventory()
            && store
                .inventory_url
                .as_deref()
                .is_none_or(|u| u.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "store '{}' uses format {} which requires inventory_url",
                store.id, store.format
            )));
        }

        if !store.search_payload.is_object() {
            return Err(ConfigError::Validation(format!(
                "store '{}' search_payload must be a mapping",
                store.id
            )));
        }

        if !seen_ids.insert(store.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
