//! Catalog item entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sesamo_core::{DomainError, DomainResult, ItemId};

/// A product in the catalog.
///
/// The unit price here is a listing price: order lines copy it at order
/// creation time and keep their copy even if the catalog price changes
/// later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Category label used for grouping in listings.
    #[serde(default)]
    pub category: String,
    /// Unit price, non-negative.
    pub price: f64,
    /// Unit weight in kilograms.
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, price: f64) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("item name must not be empty"));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::validation(format!(
                "item price must be a non-negative amount, got {price}"
            )));
        }
        Ok(Self {
            id,
            name,
            category: String::new(),
            price,
            weight: 0.0,
            picture: None,
            description: None,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_negative_price() {
        let err = Item::new(ItemId::new(), "Rye sourdough", -1.0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_rejects_non_finite_price() {
        assert!(Item::new(ItemId::new(), "Rye sourdough", f64::NAN).is_err());
        assert!(Item::new(ItemId::new(), "Rye sourdough", f64::INFINITY).is_err());
    }

    #[test]
    fn new_accepts_zero_price() {
        let item = Item::new(ItemId::new(), "Sample pack", 0.0).unwrap();
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn serde_round_trip_keeps_optional_fields() {
        let mut item = Item::new(ItemId::new(), "Goat cheese 200g", 85.0).unwrap();
        item.category = "dairy".into();
        item.description = Some("vacuum packed".into());
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
