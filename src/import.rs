// Upstream import - CSV exports from the system of record
//
// The store never owns business data; these loaders read what the upstream
// system exported so it can be handed to `set_all`.

use crate::entities::{Client, Product, Shipment, ShipmentStatus};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Separator for multi-valued cells (shipment product ids)
const LIST_SEPARATOR: char = ';';

fn read_rows<T, R>(reader: R) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

// ============================================================================
// PRODUCTS & CLIENTS (columns map 1:1 onto the entity)
// ============================================================================

pub fn read_products<R: Read>(reader: R) -> Result<Vec<Product>> {
    read_rows(reader)
}

pub fn read_clients<R: Read>(reader: R) -> Result<Vec<Client>> {
    read_rows(reader)
}

pub fn load_products_csv(path: &Path) -> Result<Vec<Product>> {
    let products = read_products(std::fs::File::open(path)?)?;
    info!("event=import kind=product path={} count={}", path.display(), products.len());
    Ok(products)
}

pub fn load_clients_csv(path: &Path) -> Result<Vec<Client>> {
    let clients = read_clients(std::fs::File::open(path)?)?;
    info!("event=import kind=client path={} count={}", path.display(), clients.len());
    Ok(clients)
}

// ============================================================================
// SHIPMENTS (product_ids is a ';'-separated cell)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ShipmentRow {
    id: String,
    client_id: String,
    #[serde(default)]
    product_ids: String,
    #[serde(default)]
    status: Option<ShipmentStatus>,
    #[serde(default)]
    scheduled_for: Option<NaiveDate>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<ShipmentRow> for Shipment {
    fn from(row: ShipmentRow) -> Self {
        Shipment {
            id: row.id,
            client_id: row.client_id,
            product_ids: row
                .product_ids
                .split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            status: row.status.unwrap_or_default(),
            scheduled_for: row.scheduled_for,
            notes: row.notes.filter(|n| !n.is_empty()),
        }
    }
}

pub fn read_shipments<R: Read>(reader: R) -> Result<Vec<Shipment>> {
    let rows: Vec<ShipmentRow> = read_rows(reader)?;
    Ok(rows.into_iter().map(Shipment::from).collect())
}

pub fn load_shipments_csv(path: &Path) -> Result<Vec<Shipment>> {
    let shipments = read_shipments(std::fs::File::open(path)?)?;
    info!("event=import kind=shipment path={} count={}", path.display(), shipments.len());
    Ok(shipments)
}

// ============================================================================
// SEED DIRECTORY
// ============================================================================

/// Everything found in a seed directory
#[derive(Debug, Default)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
    pub shipments: Vec<Shipment>,
}

/// Load `products.csv`, `clients.csv`, `shipments.csv` from `dir`.
///
/// Missing files yield empty collections; a missing directory is an error.
pub fn load_seed_dir(dir: &Path) -> Result<SeedData> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "seed directory {} does not exist",
            dir.display()
        )));
    }

    let mut seed = SeedData::default();

    let products = dir.join("products.csv");
    if products.exists() {
        seed.products = load_products_csv(&products)?;
    }
    let clients = dir.join("clients.csv");
    if clients.exists() {
        seed.clients = load_clients_csv(&clients)?;
    }
    let shipments = dir.join("shipments.csv");
    if shipments.exists() {
        seed.shipments = load_shipments_csv(&shipments)?;
    }

    Ok(seed)
}
