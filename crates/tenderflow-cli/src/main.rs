use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use tenderflow_ai::{HashingEmbedder, RequirementSource};
use tenderflow_core::scan::{scan_opportunities, snapshot_listing};
use tenderflow_core::seed_entries;
use tenderflow_pipeline::{DEMO_PREFIX, InMemoryJobStore, Orchestrator, PlainTextReader};
use tenderflow_store::{CatalogStore, ProductIndex};

mod display;

#[derive(Parser)]
#[command(
    name = "tenderflow",
    version,
    about = "Tender scanning, requirement matching, and quote generation"
)]
struct Cli {
    /// Catalog database directory.
    #[arg(long, env = "TENDERFLOW_DB", default_value = "./tenderflow_db", global = true)]
    db: PathBuf,

    /// Groq API key. Without it, extraction degrades to a fixed mock item.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    groq_api_key: Option<String>,

    /// Extraction model override.
    #[arg(long, env = "TENDERFLOW_MODEL", global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the product catalog with the demo entries.
    Seed,
    /// Scan tender listings for upcoming opportunities.
    Scan {
        /// Print the raw JSON report instead of the table.
        #[arg(long)]
        json: bool,
    },
    /// Process an RFP document and print the priced quote.
    Process {
        /// Document file. Use --demo to run the built-in sample instead.
        file: Option<PathBuf>,

        /// Print the raw JSON quote instead of the card.
        #[arg(long)]
        json: bool,

        /// Run the built-in simulated demo document.
        #[arg(long)]
        demo: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let Cli {
        db,
        groq_api_key,
        model,
        command,
    } = Cli::parse();

    match command {
        Command::Seed => seed(&db).await,
        Command::Scan { json } => scan(json),
        Command::Process { file, json, demo } => {
            process(&db, groq_api_key, model, file.as_deref(), json, demo).await
        }
    }
}

async fn open_catalog(db: &Path) -> anyhow::Result<Arc<CatalogStore>> {
    let store = CatalogStore::open(db, Arc::new(HashingEmbedder::default()))
        .await
        .with_context(|| format!("opening catalog database at {}", db.display()))?;
    Ok(Arc::new(store))
}

async fn seed(db: &Path) -> anyhow::Result<()> {
    let store = open_catalog(db).await?;
    let entries = seed_entries();
    store.upsert(&entries).await.context("seeding catalog")?;

    let count = store.count().await?;
    info!(count, db = %db.display(), "catalog seeded");
    println!("Seeded {} products ({} rows in catalog).", entries.len(), count);
    Ok(())
}

fn scan(json: bool) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let report = scan_opportunities(&snapshot_listing(today), today, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display::print_scan_report(&report);
    }
    Ok(())
}

async fn process(
    db: &Path,
    groq_api_key: Option<String>,
    model: Option<String>,
    file: Option<&Path>,
    json: bool,
    demo: bool,
) -> anyhow::Result<()> {
    let bytes = if demo {
        DEMO_PREFIX.to_vec()
    } else {
        let file = file.context("pass a document FILE or --demo")?;
        std::fs::read(file).with_context(|| format!("reading {}", file.display()))?
    };

    let index: Arc<dyn ProductIndex> = open_catalog(db).await?;
    let source = RequirementSource::from_credentials(groq_api_key, model)?;
    let orchestrator = Orchestrator::new(
        Arc::new(PlainTextReader),
        Arc::new(source),
        index,
        Arc::new(InMemoryJobStore::new()),
    );

    let result = orchestrator.process_document(&bytes).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::print_quote(&result);
    }
    Ok(())
}
