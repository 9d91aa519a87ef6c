// Persist policy - which store fields survive a reload
//
// Only selection state is ever written. Entity collections are re-fetched
// from the upstream source so the cache never serves stale business data.

use super::selection::SelectionState;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default key-value slot for the persisted selection
pub const DEFAULT_NAMESPACE: &str = "inventory-storage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistedField {
    SelectedProducts,
    SelectedClient,
}

impl PersistedField {
    /// Key used inside the persisted JSON object
    pub fn key(&self) -> &'static str {
        match self {
            PersistedField::SelectedProducts => "selectedProducts",
            PersistedField::SelectedClient => "selectedClient",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistPolicy {
    pub fields: Vec<PersistedField>,
}

impl Default for PersistPolicy {
    fn default() -> Self {
        PersistPolicy {
            fields: vec![PersistedField::SelectedProducts, PersistedField::SelectedClient],
        }
    }
}

impl PersistPolicy {
    /// Persist nothing
    pub fn none() -> Self {
        PersistPolicy { fields: Vec::new() }
    }

    pub fn new(fields: Vec<PersistedField>) -> Self {
        PersistPolicy { fields }
    }

    pub fn includes(&self, field: PersistedField) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode the policy's fields of `selection` as a JSON object
    pub fn snapshot(&self, selection: &SelectionState) -> Value {
        let mut object = Map::new();

        if self.includes(PersistedField::SelectedProducts) {
            object.insert(
                PersistedField::SelectedProducts.key().to_string(),
                Value::from(selection.selected_products.clone()),
            );
        }
        if self.includes(PersistedField::SelectedClient) {
            object.insert(
                PersistedField::SelectedClient.key().to_string(),
                selection
                    .selected_client
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
        }

        Value::Object(object)
    }

    /// Rebuild selection state from a stored snapshot.
    ///
    /// Fields outside the policy are ignored; malformed fields fall back to
    /// their empty value.
    pub fn restore(&self, stored: &Value) -> SelectionState {
        let mut selection = SelectionState::new();

        let object = match stored.as_object() {
            Some(object) => object,
            None => {
                warn!("event=selection_restore status=ignored reason=not_an_object");
                return selection;
            }
        };

        if self.includes(PersistedField::SelectedProducts) {
            if let Some(value) = object.get(PersistedField::SelectedProducts.key()) {
                match serde_json::from_value::<Vec<String>>(value.clone()) {
                    Ok(ids) => {
                        // first occurrence wins, order kept
                        for id in ids {
                            if !selection.is_product_selected(&id) {
                                selection.selected_products.push(id);
                            }
                        }
                    }
                    Err(err) => warn!(
                        "event=selection_restore field=selectedProducts status=ignored error={}",
                        err
                    ),
                }
            }
        }

        if self.includes(PersistedField::SelectedClient) {
            if let Some(value) = object.get(PersistedField::SelectedClient.key()) {
                match value {
                    Value::String(id) => selection.selected_client = Some(id.clone()),
                    Value::Null => {}
                    other => warn!(
                        "event=selection_restore field=selectedClient status=ignored value={}",
                        other
                    ),
                }
            }
        }

        selection
    }
}
