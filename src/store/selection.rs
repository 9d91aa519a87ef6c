// Selection state - multi-selected product rows + one selected client
//
// Insertion order of selected product ids is kept so the UI can show them
// in the order the user picked them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub selected_products: Vec<String>,
    pub selected_client: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert if absent, remove if present. Returns true if now selected.
    pub fn toggle_product(&mut self, id: &str) -> bool {
        if let Some(index) = self.selected_products.iter().position(|p| p == id) {
            self.selected_products.remove(index);
            false
        } else {
            self.selected_products.push(id.to_string());
            true
        }
    }

    pub fn deselect_product(&mut self, id: &str) -> bool {
        let before = self.selected_products.len();
        self.selected_products.retain(|p| p != id);
        self.selected_products.len() != before
    }

    pub fn is_product_selected(&self, id: &str) -> bool {
        self.selected_products.iter().any(|p| p == id)
    }

    pub fn clear_products(&mut self) {
        self.selected_products.clear();
    }

    pub fn select_client(&mut self, id: Option<String>) {
        self.selected_client = id;
    }
}
