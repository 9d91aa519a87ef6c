// Bloomwell - Web Server
// JSON API over the pregnancy calculator and the inventory store

use anyhow::{anyhow, Context, Result};
use bloomwell::api::{router, AppState};
use bloomwell::logging::init_logging;
use bloomwell::{load_seed_dir, AppConfig, InventoryStore, SelectionStorage, SqliteStorage};
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(None).context("Failed to load config")?;
    init_logging(&config.log_level).map_err(|e| anyhow!(e))?;

    println!("🌐 Bloomwell - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Open durable storage for the selection slot
    let storage = SqliteStorage::open(&config.database_path)
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;
    println!("✓ Storage opened: {}", config.database_path.display());

    let storage: Box<dyn SelectionStorage + Send> = Box::new(storage);
    let mut store = InventoryStore::open(storage, &config.storage_namespace, config.persist_policy())?;
    println!("✓ Selection namespace: {}", store.namespace());

    // Collections are never persisted; seed them from the upstream export if configured
    if let Some(seed_dir) = &config.seed_dir {
        let seed = load_seed_dir(seed_dir)
            .with_context(|| format!("Failed to load seed data from {}", seed_dir.display()))?;
        println!(
            "✓ Seeded {} products, {} clients, {} shipments",
            seed.products.len(),
            seed.clients.len(),
            seed.shipments.len()
        );
        store.set_all(seed.products)?;
        store.set_all(seed.clients)?;
        store.set_all(seed.shipments)?;
    }

    let app = router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("event=server_start bind_addr={}", config.bind_addr);
    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/health", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
