// Entity Models - agricultural inventory admin
//
// Each entity has:
// - Stable identity (string id) that the store never rewrites
// - A Patch type for shallow-merge updates (every field optional)
// - A hook telling the store which collection it lives in

pub mod product;
pub mod client;
pub mod shipment;

pub use product::{Product, ProductPatch};
pub use client::{Client, ClientPatch};
pub use shipment::{Shipment, ShipmentPatch, ShipmentStatus};

use crate::store::{Action, Collection, CollectionOp, InventoryState};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The three collections the store keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Client,
    Shipment,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Client => "client",
            EntityKind::Shipment => "shipment",
        }
    }

    /// Parse a collection name ("products", "client", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "product" | "products" => Some(EntityKind::Product),
            "client" | "clients" => Some(EntityKind::Client),
            "shipment" | "shipments" => Some(EntityKind::Shipment),
            _ => None,
        }
    }
}

/// A record the store can cache.
///
/// The store only ever looks at `id()`; everything else is opaque to it.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + 'static {
    /// Partial update, applied field by field
    type Patch: Clone + Debug + Default + Serialize + DeserializeOwned + Send + 'static;

    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Shallow merge: overwrite exactly the fields set in `patch`
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Fill clock-derived patch fields before the patch reaches the reducer
    fn stamp_patch(_patch: &mut Self::Patch, _now: DateTime<Utc>) {}

    /// Wrap a collection operation into a store action
    fn action(op: CollectionOp<Self>) -> Action;

    /// Borrow this entity's collection from the state
    fn collection(state: &InventoryState) -> &Collection<Self>;
}
