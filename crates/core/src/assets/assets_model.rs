//! Asset domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single holding tracked by the portfolio.
///
/// Identity is immutable once created; currency, platform, and category may
/// change over the asset's life. A value record is always denominated in the
/// asset's *current* currency at read time; currencies are not versioned
/// historically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    /// Free-text broker or exchange label the asset is held on.
    pub platform: String,
    /// ISO-4217 style currency code, compared case-insensitively.
    pub currency: String,
    /// Optional reference into the category list. `None` means the asset
    /// lands in the uncategorized bucket.
    pub category_id: Option<String>,
}

impl Asset {
    pub fn new(name: &str, platform: &str, currency: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            platform: platform.to_string(),
            currency: currency.to_string(),
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: &str) -> Self {
        self.category_id = Some(category_id.to_string());
        self
    }
}
