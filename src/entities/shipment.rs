// 🚚 Shipment Entity - products on their way to a client
//
// client_id and product_ids are plain references; the store does not check
// that they point at live entities.

use super::{Entity, EntityKind};
use crate::store::{Action, Collection, CollectionOp, InventoryState};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// SHIPMENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "Pending",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Delivered and cancelled shipments no longer move
    pub fn is_final(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }
}

// ============================================================================
// SHIPMENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Stable identity - never patched
    pub id: String,

    pub client_id: String,

    #[serde(default)]
    pub product_ids: Vec<String>,

    #[serde(default)]
    pub status: ShipmentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Shipment {
    pub fn new(client_id: String, product_ids: Vec<String>) -> Self {
        Shipment {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            product_ids,
            status: ShipmentStatus::Pending,
            scheduled_for: None,
            notes: None,
        }
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }
}

// ============================================================================
// PATCH
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ShipmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Shipment {
    type Patch = ShipmentPatch;

    const KIND: EntityKind = EntityKind::Shipment;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: ShipmentPatch) {
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        // Shallow merge: a new list replaces the old one wholesale
        if let Some(product_ids) = patch.product_ids {
            self.product_ids = product_ids;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.scheduled_for.is_some() {
            self.scheduled_for = patch.scheduled_for;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }

    fn action(op: CollectionOp<Self>) -> Action {
        Action::Shipments(op)
    }

    fn collection(state: &InventoryState) -> &Collection<Self> {
        &state.shipments
    }
}

// ============================================================================
// TESTS
// ============================================================================
