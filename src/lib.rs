// Bloomwell - Core Library
// Pregnancy progress calculator + inventory entity store, shared by the
// CLI, the API server, and tests

pub mod error;
pub mod logging;
pub mod config;
pub mod pregnancy;      // Derived pregnancy metrics
pub mod guidelines;     // Weight-gain reference ranges
pub mod entities;       // Product / Client / Shipment
pub mod store;          // State container + reducer + persist policy
pub mod storage;        // Durable key-value slot
pub mod import;         // Upstream CSV feeds

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{Error, Result};
pub use config::AppConfig;
pub use pregnancy::{
    GestationalAge, MaternalHealth, PregnancyInfo, PregnancyProgress, Trimester,
    WeightGainStatus,
    date_at_midnight, days_until_due, estimated_due_date, gestational_age,
    progress_percentage, weight_gain_status,
};
pub use guidelines::{BmiCategory, WeightGainGuideline, bmi};
pub use entities::{
    Entity, EntityKind,
    Product, ProductPatch,
    Client, ClientPatch,
    Shipment, ShipmentPatch, ShipmentStatus,
};
pub use store::{
    Action, Collection, CollectionOp, InventoryState, InventoryStore,
    PersistPolicy, PersistedField, SelectionState, reduce,
};
pub use storage::{MemoryStorage, SelectionStorage, SqliteStorage};
pub use import::{
    SeedData, load_clients_csv, load_products_csv, load_seed_dir, load_shipments_csv,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
