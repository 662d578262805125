//! tally CLI
//!
//! Runs statements and aggregation services against the datastore.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tally_app::{budgets_with_live_spend, dashboard_summary, now_millis};
use tally_db::{Database, MemoryStore, RestConfig, RestStore};
use tally_sql::SqlValue;

/// Personal-finance SQL over a PostgREST datastore.
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Datastore base URL.
    #[arg(long, env = "TALLY_DATASTORE_URL")]
    datastore_url: Option<String>,

    /// Service key for the datastore.
    #[arg(long, env = "TALLY_SERVICE_KEY", hide_env_values = true)]
    service_key: Option<String>,

    /// Use an in-memory datastore seeded from this JSON file instead.
    #[arg(long, conflicts_with = "datastore_url")]
    fixture: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one statement.
    Query {
        /// Statement text with `?` placeholders.
        sql: String,

        /// Positional parameter as JSON (`42`, `"text"`, `null`); repeatable.
        /// Values that are not valid JSON are taken as text.
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// How to execute the statement.
        #[arg(short, long, value_enum, default_value_t = Mode::All)]
        mode: Mode,
    },

    /// Show the dashboard summary for a user.
    Dashboard {
        #[arg(short, long)]
        user: String,
    },

    /// List a user's budgets with live spend.
    Budgets {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Report the number of changed rows.
    Run,
    /// Print the first row.
    Get,
    /// Print every row.
    All,
}

fn open_database(cli: &Cli) -> anyhow::Result<Database> {
    if let Some(path) = &cli.fixture {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let store = MemoryStore::from_json(serde_json::from_str(&text)?)?;
        info!(fixture = %path.display(), "Using in-memory datastore");
        return Ok(Database::from_store(store));
    }

    let (Some(url), Some(key)) = (&cli.datastore_url, &cli.service_key) else {
        bail!("--datastore-url and --service-key are required unless --fixture is given");
    };
    info!(url = %url, "Using PostgREST datastore");
    Ok(Database::from_store(RestStore::new(RestConfig::new(url, key))))
}

fn parse_param(raw: &str) -> anyhow::Result<SqlValue> {
    let Ok(json) = serde_json::from_str::<Value>(raw) else {
        return Ok(SqlValue::Text(raw.to_string()));
    };
    SqlValue::from_json(&json).with_context(|| format!("parameter {raw} is not a scalar"))
}

async fn run(command: Commands, db: &Database) -> anyhow::Result<Value> {
    let output = match command {
        Commands::Query { sql, params, mode } => {
            let params = params
                .iter()
                .map(|p| parse_param(p))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let stmt = db.prepare(sql);
            match mode {
                Mode::Run => {
                    let result = stmt.run(params).await?;
                    serde_json::json!({ "changes": result.changes })
                }
                Mode::Get => serde_json::to_value(stmt.get(params).await?)?,
                Mode::All => serde_json::to_value(stmt.all(params).await?)?,
            }
        }
        Commands::Dashboard { user } => {
            serde_json::to_value(dashboard_summary(db, &user, now_millis()).await?)?
        }
        Commands::Budgets { user } => {
            serde_json::to_value(budgets_with_live_spend(db, &user, now_millis()).await?)?
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let db = open_database(&cli)?;

    tokio::select! {
        output = run(cli.command, &db) => {
            println!("{}", serde_json::to_string_pretty(&output?)?);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
        }
    }

    db.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("42").unwrap(), SqlValue::Int(42));
        assert_eq!(parse_param("\"u1\"").unwrap(), SqlValue::Text("u1".into()));
        assert_eq!(parse_param("null").unwrap(), SqlValue::Null);
        assert_eq!(parse_param("Food").unwrap(), SqlValue::Text("Food".into()));
        assert!(parse_param("[1, 2]").is_err());
    }

    #[test]
    fn test_cli_parses_query() {
        let cli = Cli::try_parse_from([
            "tally",
            "--fixture",
            "demo.json",
            "query",
            "SELECT * FROM goals WHERE id = ?",
            "--param",
            "\"g1\"",
            "--mode",
            "get",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Query { mode: Mode::Get, ref params, .. } if params.len() == 1));
    }
}
