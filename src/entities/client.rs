// 🧑‍🌾 Client Entity - buyers of inventory

use super::{Entity, EntityKind};
use crate::store::{Action, Collection, CollectionOp, InventoryState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Stable identity - never patched
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Client {
    pub fn new(name: String) -> Self {
        Client {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email: None,
            phone: None,
            address: None,
        }
    }

    /// Best available way to reach the client
    pub fn contact(&self) -> Option<&str> {
        self.email.as_deref().or(self.phone.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Entity for Client {
    type Patch = ClientPatch;

    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
    }

    fn action(op: CollectionOp<Self>) -> Action {
        Action::Clients(op)
    }

    fn collection(state: &InventoryState) -> &Collection<Self> {
        &state.clients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_contact_prefers_email() {
        let mut client = Client::new("Finca La Esperanza".to_string());
        assert_eq!(client.contact(), None);

        client.phone = Some("+52 55 1234 5678".to_string());
        assert_eq!(client.contact(), Some("+52 55 1234 5678"));

        client.email = Some("compras@esperanza.mx".to_string());
        assert_eq!(client.contact(), Some("compras@esperanza.mx"));
    }

    #[test]
    fn test_client_patch() {
        let mut client = Client::new("Old Name".to_string());
        client.phone = Some("555".to_string());

        client.apply_patch(ClientPatch {
            name: Some("New Name".to_string()),
            email: Some("a@b.c".to_string()),
            ..Default::default()
        });

        assert_eq!(client.name, "New Name");
        assert_eq!(client.email.as_deref(), Some("a@b.c"));
        assert_eq!(client.phone.as_deref(), Some("555"));
    }
}
