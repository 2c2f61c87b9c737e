//! Bank Reviews CLI - create and inspect the bank reviews database

use bank_reviews::config::{self, BankReviewsConfig, DATABASE_ENV};
use bank_reviews::storage::{schema, ReviewStore};
use bank_reviews::ui::{self, Icons};
use bank_reviews::output;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bank-reviews")]
#[command(version)]
#[command(about = "SQLite store for bank customer reviews and rating statistics")]
#[command(long_about = r#"
Creates and inspects the bank reviews database:
  • banks   - one row per institution, with aggregate rating statistics
  • reviews - one row per user review, deleted together with its bank

Example usage:
  bank-reviews init --database data/bank_reviews.db
  bank-reviews status --format json
  bank-reviews schema > schema.sql
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress decorative output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the tables and indexes if they do not exist
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Record the database path in the config file
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show which tables and indexes exist and how many rows they hold
    Status {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the schema as a SQL script
    Schema,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    output::set_quiet(cli.quiet);

    let config = config::load_config(cli.config.as_deref())?;
    let database_for = |flag: Option<PathBuf>| {
        config::resolve_database_path(flag.as_deref(), std::env::var(DATABASE_ENV).ok(), config.as_ref())
    };

    match cli.command {
        Commands::Init { database, write_config, force } => {
            let database = database_for(database);
            run_init(&database, cli.config.as_deref(), write_config, force)?;
        }

        Commands::Status { database, format } => {
            let database = database_for(database);
            run_status(&database, &format)?;
        }

        Commands::Schema => {
            print!("{}", schema::schema_script());
        }
    }

    Ok(())
}

fn run_init(database: &Path, config_path: Option<&Path>, write_config: bool, force: bool) -> anyhow::Result<()> {
    tracing::info!("Initializing schema in {}", database.display());
    ui::header("Initializing bank reviews database");
    ui::info(&format!("{} Database", Icons::DATABASE), &database.display().to_string());

    // Refuse before touching the database
    let config_target = config_path.map(Path::to_path_buf).unwrap_or_else(config::default_config_path);
    if write_config {
        config::check_config_writable(&config_target, force)?;
    }

    config::ensure_db_dir(database)?;
    let store = ReviewStore::open(database)?;
    let report = store.stats()?;

    if write_config {
        let config = BankReviewsConfig {
            database: Some(database.display().to_string()),
        };
        config::write_config(&config_target, &config, force)?;
        ui::info("Config written", &config_target.display().to_string());
    }

    if !output::is_quiet() {
        println!("{}", ui::schema_table(&report));
    }
    ui::success(&format!(
        "Schema ready ({} tables, {} indexes)",
        report.tables.len(),
        report.indexes.len()
    ));
    Ok(())
}

fn run_status(database: &Path, format: &str) -> anyhow::Result<()> {
    if !database.exists() {
        ui::error(&format!("No database at {}", database.display()));
        anyhow::bail!("database not found; run `bank-reviews init` first");
    }

    let store = ReviewStore::open_existing(database)?;
    let report = store.stats()?;
    let missing = report.missing();

    if format == "json" {
        let data = serde_json::json!({
            "database": database.display().to_string(),
            "complete": missing.is_empty(),
            "missing": missing,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    ui::header(&format!("{} Bank reviews status ({})", Icons::STATS, database.display()));
    ui::section("Schema");
    println!("{}", ui::schema_table(&report));
    ui::section("Rows");
    println!(
        "{}",
        ui::metrics_table(&[
            ("Banks", report.banks.to_string()),
            ("Reviews", report.reviews.to_string()),
            (
                "Foreign keys",
                if report.foreign_keys { "enforced".to_string() } else { "off".to_string() },
            ),
        ])
    );

    if missing.is_empty() {
        ui::success("All tables and indexes present");
    } else {
        ui::warn(&format!("Missing: {} (run `bank-reviews init`)", missing.join(", ")));
    }
    Ok(())
}
