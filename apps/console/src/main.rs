//! # Tillbook Console
//!
//! Interactive point-of-sale terminal for a single store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillbook Console                                 │
//! │                                                                         │
//! │  stdin ──► Shell ──► top-level dispatcher (this file)                   │
//! │                          │                                              │
//! │                          ├── register   cart sales at the till          │
//! │                          ├── logbook    paper-log entry (no tax)        │
//! │                          ├── products   catalog browse + admin edits    │
//! │                          ├── dashboard  revenue overview                │
//! │                          └── history    filter / receipts / CSV         │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                    tillbook-core (drafts, money, reports)               │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                    tillbook-db ──► SQLite (WAL)                         │
//! │                                                                         │
//! │  Logs go to stderr so prompts and tables stay clean on stdout.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod screens;
mod session;
mod shell;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tillbook_core::NewProduct;
use tillbook_db::{Database, DbConfig};

use crate::config::ConsoleConfig;
use crate::error::CliError;
use crate::session::{Role, Session};
use crate::shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "tillbook", version, about = "Point-of-sale console for a single store")]
struct Cli {
    /// SQLite database file (created on first run)
    #[arg(short = 'd', long, env = "TILLBOOK_DB", default_value = "tillbook.db")]
    db: PathBuf,

    /// Acting user, recorded on every sale
    #[arg(short = 'u', long, default_value = "admin")]
    user: String,

    /// Access role for this session
    #[arg(short = 'r', long, value_enum, default_value_t = Role::Admin)]
    role: Role,

    /// Create a small demo catalog if the database has no products
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("✗ {err}");
        std::process::exit(1);
    }
}

/// Console logs go to stderr: stdout belongs to prompts and tables.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from all crates
/// - `RUST_LOG=tillbook=trace` - Trace for tillbook crates only
/// - Default: INFO, with tillbook at DEBUG and sqlx quieted to WARN
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tillbook=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        db: db_path,
        user,
        role,
        seed,
    } = cli;

    let config = ConsoleConfig::from_env();

    info!(path = %db_path.display(), "Opening database");
    let db = Database::new(DbConfig::new(&db_path)).await?;

    if seed {
        seed_demo_catalog(&db).await?;
    }

    let session = Session::new(user, role);
    print_banner(&config, &session, &db_path);

    let mut shell = Shell::new();
    loop {
        let Some(line) = shell.prompt("tillbook> ").await? else {
            break;
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => continue,
            ["register"] => screens::register::run(&mut shell, &db, &config, &session).await?,
            ["logbook"] | ["log"] => {
                screens::logbook::run(&mut shell, &db, &config, &session).await?
            }
            ["products"] => screens::products::run(&mut shell, &db, &config, &session).await?,
            ["dashboard"] => screens::dashboard::run(&db, &config).await,
            ["history"] => screens::history::run(&mut shell, &db, &config).await?,
            ["export", args @ ..] => {
                if let Err(err) = screens::history::export_all(&db, args.first().copied()).await {
                    println!("✗ {err}");
                }
            }
            ["help"] => print_help(),
            ["quit"] | ["exit"] => break,
            [cmd, ..] => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }

    db.close().await;
    println!("Goodbye.");
    Ok(())
}

fn print_banner(config: &ConsoleConfig, session: &Session, db_path: &Path) {
    println!();
    println!("{} (tillbook {})", config.store_name, env!("CARGO_PKG_VERSION"));
    println!(
        "Database {}   Register tax {}",
        db_path.display(),
        config.tax_rate()
    );
    println!("Signed in as '{}' ({})", session.user_id, session.role);
    println!("Type 'help' for commands, 'quit' to exit.");
}

fn print_help() {
    println!("Commands:");
    println!("  register       Ring up a sale at the till");
    println!("  logbook        Enter a sale from the paper log (no tax)");
    println!("  products       Browse and manage the catalog");
    println!("  dashboard      Revenue and catalog overview");
    println!("  history        Browse, filter, and export recorded sales");
    println!("  export [path]  Write all sales to a CSV file");
    println!("  help           Show this help");
    println!("  quit           Exit");
}

/// Starter catalog for trying the console on an empty database.
const DEMO_CATALOG: &[(&str, i64, &str)] = &[
    ("Espresso Beans 1kg", 4500, "Coffee"),
    ("House Blend 500g", 2800, "Coffee"),
    ("Dark Chocolate Bar", 1250, "Sweets"),
    ("Almond Biscotti", 950, "Sweets"),
    ("Lavender Syrup", 1800, "Syrups"),
    ("Earl Grey Tin", 2200, "Tea"),
];

/// Seeds the demo catalog, but only into a database with no products;
/// an existing catalog is never touched.
async fn seed_demo_catalog(db: &Database) -> Result<(), CliError> {
    if db.products().count().await? > 0 {
        println!("Database already has products; skipping demo seed.");
        return Ok(());
    }

    for (name, price_cents, category) in DEMO_CATALOG {
        db.products()
            .create(&NewProduct {
                name: (*name).to_string(),
                price_cents: *price_cents,
                category: (*category).to_string(),
            })
            .await?;
    }
    println!("✓ Seeded {} demo products.", DEMO_CATALOG.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_demo_catalog_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        seed_demo_catalog(&db).await.unwrap();
        seed_demo_catalog(&db).await.unwrap();

        let count = db.products().count().await.unwrap();
        assert_eq!(count as usize, DEMO_CATALOG.len());
    }
}
