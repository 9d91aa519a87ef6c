// Entity collection - ordered, id-addressed, permissive
//
// Unknown ids are no-ops, never errors. set_all does not look for duplicate
// ids; add replaces an existing entity with the same id in place.

use crate::entities::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<E> {
    items: Vec<E>,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Collection { items: Vec::new() }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, duplicates and all
    pub fn set_all(&mut self, items: Vec<E>) {
        self.items = items;
    }

    /// Upsert. Returns true when an existing entity was replaced.
    pub fn add(&mut self, entity: E) -> bool {
        match self.position(entity.id()) {
            Some(index) => {
                self.items[index] = entity;
                true
            }
            None => {
                self.items.push(entity);
                false
            }
        }
    }

    /// Shallow-merge into the first match. Returns false if `id` is unknown.
    pub fn update(&mut self, id: &str, patch: E::Patch) -> bool {
        match self.items.iter_mut().find(|e| e.id() == id) {
            Some(entity) => {
                entity.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Remove every entity with `id`. Returns true if anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|e| e.id() != id);
        self.items.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }
}

impl<'a, E: Entity> IntoIterator for &'a Collection<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Client, ClientPatch};

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_set_all_keeps_duplicates() {
        let mut clients = Collection::new();
        clients.set_all(vec![client("c-1", "A"), client("c-1", "B")]);

        assert_eq!(clients.len(), 2);
        assert_eq!(clients.get("c-1").unwrap().name, "A");
    }

    #[test]
    fn test_add_upserts() {
        let mut clients = Collection::new();

        assert!(!clients.add(client("c-1", "A")));
        assert!(!clients.add(client("c-2", "B")));
        assert!(clients.add(client("c-1", "A2")));

        assert_eq!(clients.len(), 2);
        // Replaced in place, order preserved
        assert_eq!(clients.as_slice()[0].name, "A2");
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut clients = Collection::new();
        clients.add(client("c-1", "A"));

        let changed = clients.update(
            "missing",
            ClientPatch {
                name: Some("X".to_string()),
                ..Default::default()
            },
        );

        assert!(!changed);
        assert_eq!(clients.get("c-1").unwrap().name, "A");
    }

    #[test]
    fn test_update_first_match_only() {
        let mut clients = Collection::new();
        clients.set_all(vec![client("c-1", "A"), client("c-1", "B")]);

        clients.update(
            "c-1",
            ClientPatch {
                name: Some("Z".to_string()),
                ..Default::default()
            },
        );

        let names: Vec<&str> = clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "B"]);
    }

    #[test]
    fn test_remove() {
        let mut clients = Collection::new();
        clients.add(client("c-1", "A"));
        clients.add(client("c-2", "B"));

        assert!(clients.remove("c-1"));
        assert!(!clients.remove("c-1"));
        assert!(!clients.contains("c-1"));
        assert_eq!(clients.len(), 1);
    }
}
