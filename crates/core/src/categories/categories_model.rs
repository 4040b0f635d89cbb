//! Category domain models.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};

/// A user-defined allocation bucket assets can be assigned to.
///
/// Categories without a target allocation are informational only and never
/// receive rebalancing suggestions. Targets across categories are not
/// required to sum to 100; the rebalancing engine surfaces that as a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Target share of the whole portfolio, in percent (0-100).
    pub target_allocation: Option<Decimal>,
    pub display_order: i32,
}

impl Category {
    pub fn new(name: &str, display_order: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            target_allocation: None,
            display_order,
        }
    }

    pub fn with_target(mut self, target: Decimal) -> Self {
        self.target_allocation = Some(target);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Category name cannot be empty".to_string(),
            )));
        }
        if let Some(target) = self.target_allocation {
            if target < Decimal::ZERO || target > dec!(100) {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Target percent must be between 0 and 100".to_string(),
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_target_range() {
        let category = Category::new("Equities", 0).with_target(dec!(60));
        assert!(category.validate().is_ok());

        let boundary = Category::new("Bonds", 1).with_target(dec!(100));
        assert!(boundary.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_target() {
        let category = Category::new("Equities", 0).with_target(dec!(101));
        assert!(category.validate().is_err());

        let negative = Category::new("Bonds", 1).with_target(dec!(-1));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let category = Category::new("  ", 0);
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let category = Category::new("Equities", 2).with_target(dec!(60));
        let json = serde_json::to_value(&category).unwrap();
        assert!(json.get("targetAllocation").is_some());
        assert!(json.get("displayOrder").is_some());
    }
}
