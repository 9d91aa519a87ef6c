// 🌾 Product Entity - inventory line item
//
// "Product id is IDENTITY, everything else is a VALUE that patches overwrite"

use super::{Entity, EntityKind};
use crate::store::{Action, Collection, CollectionOp, InventoryState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// PRODUCT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identity - never patched
    pub id: String,

    pub name: String,

    /// Free-form grouping ("Seeds", "Fertilizer", "Feed", ...)
    #[serde(default)]
    pub category: String,

    /// Units in stock
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub quantity: f64,

    /// Unit of measure ("kg", "bag", "l")
    #[serde(default)]
    pub unit: String,

    #[serde(default, deserialize_with = "blank_as_zero")]
    pub unit_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Empty CSV cells (and JSON null) read as 0
fn blank_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Create a new product with a fresh UUID
    pub fn new(name: String, category: String, quantity: f64, unit: String, unit_price: f64) -> Self {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            category,
            quantity,
            unit,
            unit_price,
            supplier: None,
            updated_at: Utc::now(),
        }
    }

    /// Stock value at the current unit price
    pub fn stock_value(&self) -> f64 {
        self.quantity * self.unit_price
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0.0
    }
}

// ============================================================================
// PATCH
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Modification time, stamped by the store before dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Product {
    type Patch = ProductPatch;

    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = Some(supplier);
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at;
        }
    }

    fn stamp_patch(patch: &mut ProductPatch, now: DateTime<Utc>) {
        patch.updated_at.get_or_insert(now);
    }

    fn action(op: CollectionOp<Self>) -> Action {
        Action::Products(op)
    }

    fn collection(state: &InventoryState) -> &Collection<Self> {
        &state.products
    }
}

// ============================================================================
// TESTS
// ============================================================================
