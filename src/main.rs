use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use bloomwell::import::{load_clients_csv, load_products_csv, load_shipments_csv};
use bloomwell::logging::init_logging;
use bloomwell::{
    date_at_midnight, AppConfig, InventoryStore, MaternalHealth, PregnancyInfo, SqliteStorage,
    WeightGainGuideline,
};

#[derive(Parser)]
#[command(name = "bloomwell", version, about = "Pregnancy progress + inventory selection tools")]
struct Cli {
    /// Config file (defaults to $BLOOMWELL_CONFIG or ./bloomwell.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gestational age, days until due, percent complete
    Progress {
        /// Pregnancy start (LMP or conception), YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// Due date; defaults to start + 280 days
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Evaluate as of this date instead of today
        #[arg(long)]
        now: Option<NaiveDate>,
    },
    /// Classify cumulative weight gain against a target range
    Weight {
        #[arg(long)]
        gain: f64,
        #[arg(long)]
        min: f64,
        #[arg(long)]
        max: f64,
    },
    /// Recommended gain for a pre-pregnancy BMI
    Guideline {
        #[arg(long)]
        bmi: f64,
        /// Also print the target range at this gestational week
        #[arg(long)]
        week: Option<i64>,
    },
    /// Inspect or change the persisted product/client selection
    Selection {
        #[command(subcommand)]
        action: SelectionCommand,
    },
    /// Parse an upstream CSV export and report what it contains
    InspectCsv {
        #[arg(long, value_enum)]
        kind: CsvKind,
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum SelectionCommand {
    Show,
    /// Select the product if unselected, otherwise deselect it
    Toggle { product_id: String },
    /// Deselect all products
    Clear,
    /// Set the selected client; omit the id to clear it
    Client { client_id: Option<String> },
    /// Delete the persisted slot entirely
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum CsvKind {
    Products,
    Clients,
    Shipments,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    init_logging(&config.log_level).map_err(|e| anyhow!(e))?;

    match cli.command {
        Command::Progress { start, due, now } => run_progress(start, due, now),
        Command::Weight { gain, min, max } => run_weight(gain, min, max),
        Command::Guideline { bmi, week } => run_guideline(bmi, week),
        Command::Selection { action } => run_selection(&config, action),
        Command::InspectCsv { kind, path } => run_inspect_csv(kind, &path),
    }
}

fn run_progress(start: NaiveDate, due: Option<NaiveDate>, now: Option<NaiveDate>) -> Result<()> {
    let start = date_at_midnight(start);
    let now = now.map(date_at_midnight).unwrap_or_else(Utc::now);

    let info = match due {
        Some(due) => PregnancyInfo::new(start, date_at_midnight(due), now)?,
        None => PregnancyInfo::from_lmp(start, now),
    };
    let progress = info.progress();

    println!("🤰 Pregnancy Progress");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Due date:        {}", info.due.date_naive());
    println!("Gestational age: {}", progress.gestational_age);
    println!("Trimester:       {}", progress.trimester.number());
    println!("Progress:        {:.1}%", progress.progress_percentage);
    if progress.overdue {
        println!("Overdue by:      {} days", -progress.days_until_due);
    } else {
        println!("Days until due:  {}", progress.days_until_due);
    }

    Ok(())
}

fn run_weight(gain: f64, min: f64, max: f64) -> Result<()> {
    let health = MaternalHealth::new(gain, min, max)?;

    println!(
        "Weight gain {:.1} kg against [{:.1}, {:.1}] kg: {}",
        health.weight_gain_kg,
        health.target_min_kg,
        health.target_max_kg,
        health.status().as_str()
    );

    Ok(())
}

fn run_guideline(bmi: f64, week: Option<i64>) -> Result<()> {
    if !(bmi > 0.0) {
        return Err(anyhow!("BMI must be positive, got {}", bmi));
    }
    let guideline = WeightGainGuideline::for_bmi(bmi);

    println!("📏 BMI {:.1} ({})", bmi, guideline.category.as_str());
    println!(
        "Total gain:  {:.1} - {:.1} kg",
        guideline.total_min_kg, guideline.total_max_kg
    );
    println!(
        "Weekly rate: {:.2} - {:.2} kg (2nd/3rd trimester)",
        guideline.weekly_min_kg, guideline.weekly_max_kg
    );

    if let Some(week) = week {
        let (min, max) = guideline.target_range_at_week(week);
        println!("Week {}:     {:.1} - {:.1} kg", week, min, max);
    }

    Ok(())
}

fn run_selection(config: &AppConfig, action: SelectionCommand) -> Result<()> {
    let mut storage = SqliteStorage::open(&config.database_path)
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    if let SelectionCommand::Reset = action {
        let removed = storage.remove(&config.storage_namespace)?;
        println!(
            "✓ {}",
            if removed { "Selection reset" } else { "Nothing to reset" }
        );
        return Ok(());
    }

    let mut store = InventoryStore::open(storage, &config.storage_namespace, config.persist_policy())?;

    match action {
        SelectionCommand::Show | SelectionCommand::Reset => {}
        SelectionCommand::Toggle { product_id } => store.toggle_selection(&product_id)?,
        SelectionCommand::Clear => store.clear_selection()?,
        SelectionCommand::Client { client_id } => store.select_client(client_id.as_deref())?,
    }

    let selection = store.selection();
    println!("🛒 Selection [{}]", store.namespace());
    println!("Selected products ({}):", selection.selected_products.len());
    for id in &selection.selected_products {
        println!("  • {}", id);
    }
    println!(
        "Selected client: {}",
        selection.selected_client.as_deref().unwrap_or("(none)")
    );

    Ok(())
}

fn run_inspect_csv(kind: CsvKind, path: &Path) -> Result<()> {
    println!("📂 Loading {}...", path.display());

    match kind {
        CsvKind::Products => {
            let products = load_products_csv(path)?;
            let stock_value: f64 = products.iter().map(|p| p.stock_value()).sum();
            let out_of_stock = products.iter().filter(|p| p.is_out_of_stock()).count();
            println!("✓ {} products", products.len());
            println!("  Stock value:  {:.2}", stock_value);
            println!("  Out of stock: {}", out_of_stock);
        }
        CsvKind::Clients => {
            let clients = load_clients_csv(path)?;
            let reachable = clients.iter().filter(|c| c.contact().is_some()).count();
            println!("✓ {} clients ({} with contact info)", clients.len(), reachable);
        }
        CsvKind::Shipments => {
            let shipments = load_shipments_csv(path)?;
            let open = shipments.iter().filter(|s| !s.status.is_final()).count();
            println!("✓ {} shipments ({} still open)", shipments.len(), open);
        }
    }

    Ok(())
}
