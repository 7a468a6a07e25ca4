use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::{Config, StorageBackend};
use core_types::{Observation, Statistics};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use web_server::AppState;

/// The main entry point for the crypto recommendation service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }
    let _guard = configuration::init_tracing(&config.logging)?;

    tracing::info!(
        backend = ?config.storage.backend,
        symbols = config.symbols.len(),
        "Configuration loaded."
    );

    let config = Arc::new(config);

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            let addr = args.addr.unwrap_or_else(|| config.server.socket_addr());
            let state = AppState::from_config(Arc::clone(&config)).await?;
            web_server::run_server(state, addr).await?;
        }
        Commands::Stats(args) => {
            validate_symbol(&config, &args.symbol)?;
            let state = AppState::from_config(Arc::clone(&config)).await?;
            handle_stats(&state, args).await?
        }
        Commands::Rank => handle_rank(&AppState::from_config(Arc::clone(&config)).await?).await?,
        Commands::Top(args) => handle_top(&AppState::from_config(Arc::clone(&config)).await?, args).await?,
        Commands::Symbols => handle_symbols(&config),
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Price statistics and volatility rankings for a fixed set of crypto currencies.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `storage.backend` from the configuration file.
    #[arg(long, global = true, value_enum)]
    backend: Option<StorageBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Show minimum, maximum, oldest and newest price of one symbol.
    Stats(StatsArgs),
    /// Rank every symbol by normalized range, most volatile first.
    Rank,
    /// Show the symbol with the highest normalized range on a given day.
    Top(TopArgs),
    /// List the configured symbols.
    Symbols,
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address, overriding `server.host` / `server.port`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct StatsArgs {
    /// The symbol to report on (e.g., "BTC").
    #[arg(long)]
    symbol: String,

    /// Restrict the statistics to one UTC day (format: YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Parser)]
struct TopArgs {
    /// The UTC day to look at (format: YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Rejects symbols outside the configured universe before any storage is opened.
fn validate_symbol(config: &Config, symbol: &str) -> anyhow::Result<()> {
    if !config.symbols.contains(symbol) {
        bail!("Invalid crypto currency symbol: {}", symbol);
    }
    Ok(())
}

async fn handle_stats(state: &AppState, args: StatsArgs) -> anyhow::Result<()> {
    let statistics = match args.date {
        Some(day) => state.engine.statistics_for_day(&args.symbol, day).await?,
        None => state.engine.statistics(&args.symbol).await?,
    };

    println!("{}", statistics_table(&statistics));
    Ok(())
}

async fn handle_rank(state: &AppState) -> anyhow::Result<()> {
    let ranked = state.engine.ranked_normalized_ranges().await?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["#", "Symbol", "Normalized range"]);
    for (position, entry) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&entry.symbol),
            Cell::new(entry.normalized_range),
        ]);
    }

    println!("{table}");
    Ok(())
}

async fn handle_top(state: &AppState, args: TopArgs) -> anyhow::Result<()> {
    match state.engine.top_symbol_for_day(args.date).await? {
        Some(symbol) => {
            let range = state.engine.normalized_range_for_day(&symbol, args.date).await?;
            match range {
                Some(range) => println!("{} ({})", symbol, range),
                None => println!("{}", symbol),
            }
        }
        None => println!("No currency has a normalized range on {}", args.date),
    }
    Ok(())
}

fn handle_symbols(config: &Config) {
    for symbol in config.symbols.iter() {
        println!("{}", symbol);
    }
}

fn statistics_table(statistics: &Statistics) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["", "Price", "Timestamp (UTC)"]);

    let rows: [(&str, &Option<Observation>); 4] = [
        ("Minimum", &statistics.minimum),
        ("Maximum", &statistics.maximum),
        ("Oldest", &statistics.oldest),
        ("Newest", &statistics.newest),
    ];
    for (label, observation) in rows {
        match observation {
            Some(o) => table.add_row(vec![
                Cell::new(label),
                Cell::new(o.price),
                Cell::new(o.timestamp.format("%Y-%m-%d %H:%M:%S")),
            ]),
            None => table.add_row(vec![Cell::new(label), Cell::new("-"), Cell::new("-")]),
        };
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::{Logging, Server, Storage};
    use core_types::SymbolUniverse;

    fn postgres_config() -> Config {
        Config {
            symbols: SymbolUniverse::new(["BTC", "ETH"]).unwrap(),
            storage: Storage {
                backend: StorageBackend::Postgres,
                path: None,
            },
            server: Server::default(),
            logging: Logging::default(),
        }
    }

    #[test]
    fn unknown_symbol_is_rejected_from_configuration_alone() {
        // No database is reachable here; validation must not need one.
        let err = validate_symbol(&postgres_config(), "DOGE").unwrap_err();
        assert_eq!(err.to_string(), "Invalid crypto currency symbol: DOGE");
    }

    #[test]
    fn configured_symbol_passes_validation() {
        assert!(validate_symbol(&postgres_config(), "BTC").is_ok());
        assert!(validate_symbol(&postgres_config(), "btc").is_err());
    }
}
