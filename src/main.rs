//! Auto Swap Agent CLI
//!
//! Command-line interface for running the swap loop and inspecting its setup.

use auto_swap_agent::config::AgentSettings;
use auto_swap_agent::tokens::format_units;
use auto_swap_agent::wallet::SecureWallet;
use auto_swap_agent::{AgentRunner, AlloyChainClient, ChainClient, Config, PairCatalog, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "auto-swap")]
#[command(about = "Unattended randomized token swap agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the swap loop until interrupted
    Run {
        /// Dry run - size trades but don't approve or swap
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the wallet's balance of every traded asset
    Balances,

    /// List the trading pairs
    Pairs,

    /// Show the effective configuration (secrets omitted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let settings = match &cli.config {
        Some(path) => AgentSettings::from_file(path)?,
        None => AgentSettings::default(),
    };
    let config = Config::from_env(settings)?;

    match cli.command {
        Commands::Run { dry_run } => run_agent(config, dry_run).await?,
        Commands::Balances => show_balances(config).await?,
        Commands::Pairs => show_pairs(&config)?,
        Commands::Config => show_config(&config)?,
    }

    Ok(())
}

async fn run_agent(config: Config, dry_run: bool) -> Result<()> {
    let wallet = SecureWallet::from_secret(&config.private_key)?;
    let catalog = PairCatalog::standard(&config.assets)?;
    let client = Arc::new(AlloyChainClient::connect(&config.rpc, &wallet));

    tracing::info!(
        address = %wallet.address(),
        rpc = %config.rpc,
        router = %config.router,
        dry_run = dry_run,
        "Starting auto swap agent"
    );

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, stopping after current iteration");
                shutdown.cancel();
            }
        });
    }

    let mut runner = AgentRunner::new(client, catalog, config.router, &config.settings)
        .with_dry_run(dry_run);
    runner.run(shutdown).await;

    Ok(())
}

async fn show_balances(config: Config) -> Result<()> {
    let wallet = SecureWallet::from_secret(&config.private_key)?;
    let client = AlloyChainClient::connect(&config.rpc, &wallet);

    println!("Wallet {}", wallet.address_string());
    for asset in config.assets.all() {
        let balance = client.balance_of(asset.address, wallet.address()).await?;
        println!(
            "  {:<5} {} ({})",
            asset.symbol,
            format_units(balance, asset.decimals),
            balance
        );
    }

    Ok(())
}

fn show_pairs(config: &Config) -> Result<()> {
    let catalog = PairCatalog::standard(&config.assets)?;
    for pair in catalog.iter() {
        println!(
            "{:<14} decimals={:<2} min_reserve={}",
            pair.to_string(),
            pair.decimals(),
            pair.min_reserve
        );
    }
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    let view = serde_json::json!({
        "rpc": config.rpc.redacted(),
        "router": config.router,
        "assets": config.assets,
        "settings": config.settings,
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
