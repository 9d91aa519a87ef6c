// Inventory Store - explicitly owned state container
//
// State changes only through `reduce(state, action) -> state`, a pure
// function. `InventoryStore` wraps the state with a storage backend and
// writes the persisted selection fields after every dispatched action.
//
// Rules:
// - Unknown ids are no-ops
// - Deleting a product also deselects it
// - Deleting a client does NOT clear the selected client
//   (see `InventoryState::dangling_client_selection`)

pub mod collection;
pub mod persist;
pub mod selection;

pub use collection::Collection;
pub use persist::{PersistPolicy, PersistedField, DEFAULT_NAMESPACE};
pub use selection::SelectionState;

use crate::entities::{Client, Entity, Product, Shipment};
use crate::error::Result;
use chrono::Utc;
use crate::storage::SelectionStorage;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    pub products: Collection<Product>,
    pub clients: Collection<Client>,
    pub shipments: Collection<Shipment>,
    pub selection: SelectionState,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State with a restored selection and empty collections
    pub fn with_selection(selection: SelectionState) -> Self {
        InventoryState {
            selection,
            ..Self::default()
        }
    }

    /// Products in the selection set that still exist, in pick order
    pub fn selected_products(&self) -> Vec<&Product> {
        self.selection
            .selected_products
            .iter()
            .filter_map(|id| self.products.get(id))
            .collect()
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.selection
            .selected_client
            .as_deref()
            .and_then(|id| self.clients.get(id))
    }

    /// Selected client id that no longer matches any loaded client.
    ///
    /// Client deletion leaves the pointer in place; callers that care can
    /// detect it here.
    pub fn dangling_client_selection(&self) -> Option<&str> {
        self.selection
            .selected_client
            .as_deref()
            .filter(|id| !self.clients.contains(id))
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Operation on one entity collection
#[derive(Debug, Clone)]
pub enum CollectionOp<E: Entity> {
    SetAll(Vec<E>),
    Add(E),
    Update { id: String, patch: E::Patch },
    Delete(String),
}

#[derive(Debug, Clone)]
pub enum Action {
    Products(CollectionOp<Product>),
    Clients(CollectionOp<Client>),
    Shipments(CollectionOp<Shipment>),
    ToggleProductSelection(String),
    ClearSelection,
    SelectClient(Option<String>),
}

impl<E: Entity> CollectionOp<E> {
    pub fn verb(&self) -> &'static str {
        match self {
            CollectionOp::SetAll(_) => "set_all",
            CollectionOp::Add(_) => "add",
            CollectionOp::Update { .. } => "update",
            CollectionOp::Delete(_) => "delete",
        }
    }
}

impl Action {
    /// Short label for logs ("product.add", "selection.toggle")
    pub fn name(&self) -> String {
        match self {
            Action::Products(op) => format!("{}.{}", Product::KIND.as_str(), op.verb()),
            Action::Clients(op) => format!("{}.{}", Client::KIND.as_str(), op.verb()),
            Action::Shipments(op) => format!("{}.{}", Shipment::KIND.as_str(), op.verb()),
            Action::ToggleProductSelection(_) => "selection.toggle".to_string(),
            Action::ClearSelection => "selection.clear".to_string(),
            Action::SelectClient(_) => "selection.client".to_string(),
        }
    }
}

// ============================================================================
// REDUCER
// ============================================================================

fn apply_op<E: Entity>(collection: &mut Collection<E>, op: CollectionOp<E>) {
    match op {
        CollectionOp::SetAll(items) => collection.set_all(items),
        CollectionOp::Add(entity) => {
            let id = entity.id().to_string();
            if collection.add(entity) {
                debug!("event=entity_add kind={} id={} status=replaced", E::KIND.as_str(), id);
            }
        }
        CollectionOp::Update { id, patch } => {
            if !collection.update(&id, patch) {
                debug!("event=entity_update kind={} id={} status=not_found", E::KIND.as_str(), id);
            }
        }
        CollectionOp::Delete(id) => {
            if !collection.remove(&id) {
                debug!("event=entity_delete kind={} id={} status=not_found", E::KIND.as_str(), id);
            }
        }
    }
}

/// Apply one action. Total: never fails, unknown ids change nothing.
pub fn reduce(mut state: InventoryState, action: Action) -> InventoryState {
    match action {
        Action::Products(op) => {
            if let CollectionOp::Delete(id) = &op {
                state.selection.deselect_product(id);
            }
            apply_op(&mut state.products, op);
        }
        Action::Clients(op) => apply_op(&mut state.clients, op),
        Action::Shipments(op) => apply_op(&mut state.shipments, op),
        Action::ToggleProductSelection(id) => {
            state.selection.toggle_product(&id);
        }
        Action::ClearSelection => state.selection.clear_products(),
        Action::SelectClient(id) => state.selection.select_client(id),
    }
    state
}

// ============================================================================
// STORE
// ============================================================================

/// State plus durable storage for the persisted selection fields
pub struct InventoryStore<S: SelectionStorage> {
    state: InventoryState,
    storage: S,
    namespace: String,
    policy: PersistPolicy,
}

impl<S: SelectionStorage> InventoryStore<S> {
    /// Open a store, restoring the selection from `storage` once
    pub fn open(storage: S, namespace: &str, policy: PersistPolicy) -> Result<Self> {
        let selection = match storage.load(namespace)? {
            Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => policy.restore(&value),
                Err(err) => {
                    warn!(
                        "event=selection_load namespace={} status=corrupt error={}",
                        namespace, err
                    );
                    SelectionState::new()
                }
            },
            None => SelectionState::new(),
        };

        info!(
            "event=store_open namespace={} selected_products={} selected_client={}",
            namespace,
            selection.selected_products.len(),
            selection.selected_client.is_some()
        );

        Ok(InventoryStore {
            state: InventoryState::with_selection(selection),
            storage,
            namespace: namespace.to_string(),
            policy,
        })
    }

    /// Open with the default namespace and policy
    pub fn open_default(storage: S) -> Result<Self> {
        Self::open(storage, DEFAULT_NAMESPACE, PersistPolicy::default())
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reduce, then write the persisted fields.
    ///
    /// The in-memory state is updated even when the write fails.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        debug!("event=dispatch action={}", action.name());
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        if self.policy.is_empty() {
            return Ok(());
        }
        let snapshot = self.policy.snapshot(&self.state.selection);
        let raw = serde_json::to_string(&snapshot)?;
        self.storage.save(&self.namespace, &raw)
    }

    // ========================================================================
    // COLLECTION OPERATIONS (uniform across entity kinds)
    // ========================================================================

    pub fn all<E: Entity>(&self) -> &[E] {
        E::collection(&self.state).as_slice()
    }

    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        E::collection(&self.state).get(id)
    }

    pub fn set_all<E: Entity>(&mut self, items: Vec<E>) -> Result<()> {
        self.dispatch(E::action(CollectionOp::SetAll(items)))
    }

    pub fn add<E: Entity>(&mut self, entity: E) -> Result<()> {
        self.dispatch(E::action(CollectionOp::Add(entity)))
    }

    /// Stamps the patch with the current time, then dispatches
    pub fn update<E: Entity>(&mut self, id: &str, mut patch: E::Patch) -> Result<()> {
        E::stamp_patch(&mut patch, Utc::now());
        self.dispatch(E::action(CollectionOp::Update {
            id: id.to_string(),
            patch,
        }))
    }

    pub fn delete<E: Entity>(&mut self, id: &str) -> Result<()> {
        self.dispatch(E::action(CollectionOp::Delete(id.to_string())))
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn toggle_selection(&mut self, product_id: &str) -> Result<()> {
        self.dispatch(Action::ToggleProductSelection(product_id.to_string()))
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.dispatch(Action::ClearSelection)
    }

    pub fn select_client(&mut self, client_id: Option<&str>) -> Result<()> {
        self.dispatch(Action::SelectClient(client_id.map(str::to_string)))
    }

    pub fn selection(&self) -> &SelectionState {
        &self.state.selection
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClientPatch, ProductPatch};
    use crate::storage::MemoryStorage;

    fn product(id: &str, name: &str) -> Product {
        let mut p = Product::new(name.to_string(), "Seeds".to_string(), 10.0, "kg".to_string(), 2.0);
        p.id = id.to_string();
        p
    }

    fn client(id: &str) -> Client {
        let mut c = Client::new(format!("Client {}", id));
        c.id = id.to_string();
        c
    }

    #[test]
    fn test_reduce_set_all_and_add() {
        let state = reduce(
            InventoryState::new(),
            Action::Products(CollectionOp::SetAll(vec![product("p-1", "A"), product("p-2", "B")])),
        );
        let state = reduce(state, Action::Products(CollectionOp::Add(product("p-3", "C"))));

        assert_eq!(state.products.len(), 3);
        assert!(state.clients.is_empty());
    }

    #[test]
    fn test_reduce_update_is_shallow_merge() {
        let state = reduce(
            InventoryState::new(),
            Action::Products(CollectionOp::Add(product("p-1", "A"))),
        );
        let state = reduce(
            state,
            Action::Products(CollectionOp::Update {
                id: "p-1".to_string(),
                patch: ProductPatch {
                    quantity: Some(99.0),
                    ..Default::default()
                },
            }),
        );

        let p = state.products.get("p-1").unwrap();
        assert_eq!(p.quantity, 99.0);
        assert_eq!(p.name, "A");
    }

    #[test]
    fn test_reduce_unknown_ids_are_noops() {
        let state = reduce(
            InventoryState::new(),
            Action::Clients(CollectionOp::Add(client("c-1"))),
        );
        let before = state.clone();

        let state = reduce(state, Action::Clients(CollectionOp::Delete("missing".to_string())));
        let state = reduce(
            state,
            Action::Clients(CollectionOp::Update {
                id: "missing".to_string(),
                patch: ClientPatch::default(),
            }),
        );

        assert_eq!(state, before);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let state = reduce(InventoryState::new(), Action::ToggleProductSelection("p-1".to_string()));
        let before = state.selection.clone();

        let state = reduce(state, Action::ToggleProductSelection("p-2".to_string()));
        assert!(state.selection.is_product_selected("p-2"));
        let state = reduce(state, Action::ToggleProductSelection("p-2".to_string()));

        assert_eq!(state.selection, before);
    }

    #[test]
    fn test_delete_product_cascades_to_selection() {
        let state = reduce(
            InventoryState::new(),
            Action::Products(CollectionOp::SetAll(vec![product("p-1", "A"), product("p-2", "B")])),
        );
        let state = reduce(state, Action::ToggleProductSelection("p-1".to_string()));
        let state = reduce(state, Action::ToggleProductSelection("p-2".to_string()));

        let state = reduce(state, Action::Products(CollectionOp::Delete("p-1".to_string())));

        assert!(!state.products.contains("p-1"));
        assert!(!state.selection.is_product_selected("p-1"));
        assert_eq!(state.selection.selected_products, vec!["p-2"]);
    }

    #[test]
    fn test_delete_client_keeps_selected_client() {
        let state = reduce(
            InventoryState::new(),
            Action::Clients(CollectionOp::Add(client("c-1"))),
        );
        let state = reduce(state, Action::SelectClient(Some("c-1".to_string())));
        assert_eq!(state.dangling_client_selection(), None);
        assert_eq!(state.selected_client().unwrap().id, "c-1");

        let state = reduce(state, Action::Clients(CollectionOp::Delete("c-1".to_string())));

        assert_eq!(state.selection.selected_client.as_deref(), Some("c-1"));
        assert_eq!(state.dangling_client_selection(), Some("c-1"));
        assert!(state.selected_client().is_none());
    }

    #[test]
    fn test_clear_selection_keeps_client() {
        let state = reduce(InventoryState::new(), Action::ToggleProductSelection("p-1".to_string()));
        let state = reduce(state, Action::SelectClient(Some("c-1".to_string())));
        let state = reduce(state, Action::ClearSelection);

        assert!(state.selection.selected_products.is_empty());
        assert_eq!(state.selection.selected_client.as_deref(), Some("c-1"));

        let state = reduce(state, Action::SelectClient(None));
        assert!(state.selection.selected_client.is_none());
    }

    #[test]
    fn test_selected_products_skips_missing() {
        let state = reduce(
            InventoryState::new(),
            Action::Products(CollectionOp::Add(product("p-1", "A"))),
        );
        let state = reduce(state, Action::ToggleProductSelection("ghost".to_string()));
        let state = reduce(state, Action::ToggleProductSelection("p-1".to_string()));

        let selected: Vec<&str> = state.selected_products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(selected, vec!["p-1"]);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::ClearSelection.name(), "selection.clear");
        assert_eq!(
            Action::Shipments(CollectionOp::Delete("s".to_string())).name(),
            "shipment.delete"
        );
        assert_eq!(
            Action::Clients(CollectionOp::SetAll(Vec::new())).name(),
            "client.set_all"
        );
    }

    #[test]
    fn test_store_persists_selection_only() {
        let mut store = InventoryStore::open_default(MemoryStorage::new()).unwrap();

        store.add(product("p-1", "A")).unwrap();
        store.toggle_selection("p-1").unwrap();
        store.select_client(Some("c-1")).unwrap();

        let raw = store.storage().get(DEFAULT_NAMESPACE).unwrap();
        let stored: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            stored,
            serde_json::json!({"selectedProducts": ["p-1"], "selectedClient": "c-1"})
        );
    }

    #[test]
    fn test_store_reopen_restores_selection_not_collections() {
        let mut store = InventoryStore::open_default(MemoryStorage::new()).unwrap();
        store.set_all(vec![product("p-1", "A"), product("p-2", "B")]).unwrap();
        store.toggle_selection("p-2").unwrap();

        let storage = store.storage().clone();
        let reopened = InventoryStore::open_default(storage).unwrap();

        assert!(reopened.all::<Product>().is_empty());
        assert_eq!(reopened.selection().selected_products, vec!["p-2"]);
    }

    #[test]
    fn test_store_corrupt_slot_starts_empty() {
        let mut storage = MemoryStorage::new();
        storage.save(DEFAULT_NAMESPACE, "{not json").unwrap();

        let store = InventoryStore::open_default(storage).unwrap();
        assert_eq!(store.selection(), &SelectionState::new());
    }

    #[test]
    fn test_store_empty_policy_writes_nothing() {
        let mut store =
            InventoryStore::open(MemoryStorage::new(), DEFAULT_NAMESPACE, PersistPolicy::none()).unwrap();
        store.toggle_selection("p-1").unwrap();

        assert!(store.storage().get(DEFAULT_NAMESPACE).is_none());
        assert!(store.selection().is_product_selected("p-1"));
    }

    #[test]
    fn test_store_generic_accessors() {
        let mut store = InventoryStore::open_default(MemoryStorage::new()).unwrap();
        store.add(client("c-1")).unwrap();
        store
            .update::<Client>(
                "c-1",
                ClientPatch {
                    email: Some("x@y.z".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(store.get::<Client>("c-1").unwrap().email.as_deref(), Some("x@y.z"));

        store.delete::<Client>("c-1").unwrap();
        assert!(store.all::<Client>().is_empty());
    }

    #[test]
    fn test_reduce_is_pure_for_product_update() {
        let state = reduce(
            InventoryState::new(),
            Action::Products(CollectionOp::Add(product("p-1", "A"))),
        );
        let update = || {
            Action::Products(CollectionOp::Update {
                id: "p-1".to_string(),
                patch: ProductPatch::default(),
            })
        };

        let a = reduce(state.clone(), update());
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = reduce(state.clone(), update());

        assert_eq!(a, b);
        assert_eq!(a, state);
    }

    #[test]
    fn test_store_update_stamps_product() {
        let mut store = InventoryStore::open_default(MemoryStorage::new()).unwrap();
        let mut p = product("p-1", "A");
        p.updated_at = Utc::now() - chrono::Duration::days(3);
        let stale = p.updated_at;
        store.add(p).unwrap();

        store
            .update::<Product>(
                "p-1",
                ProductPatch {
                    quantity: Some(1.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(store.get::<Product>("p-1").unwrap().updated_at > stale);
    }

    #[test]
    fn test_store_namespace() {
        let store = InventoryStore::open(MemoryStorage::new(), "tab-a", PersistPolicy::default()).unwrap();
        assert_eq!(store.namespace(), "tab-a");
    }
}
