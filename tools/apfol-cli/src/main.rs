//! Apfol CLI - command line storefront.
//!
//! Commands:
//! - `apfol cart` - Show and edit the cart, start checkout
//! - `apfol buy` - Check out a single product directly
//! - `apfol quote` - Preview a product page price
//! - `apfol config` - Manage configuration
//! - `apfol viewer` - Simulate the 3D viewer's rotation control

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use apfol_core::LogLevel;
use commands::{BuyArgs, CartArgs, ConfigArgs, QuoteArgs, ViewerArgs};

/// Apfol CLI - browse, quote and buy from the Apfol storefront
#[derive(Parser)]
#[command(name = "apfol")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory for the persisted cart
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart(CartArgs),

    /// Check out a single product without touching the cart
    Buy(BuyArgs),

    /// Preview the product page price for a quantity
    Quote(QuoteArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Simulate the product viewer's rotation
    Viewer(ViewerArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let loaded = context::Context::load(
        cli.config.as_deref(),
        cli.data_dir.as_deref(),
        output.clone(),
    );
    let ctx = match loaded {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let mut logging = ctx.config.logging.clone();
    if cli.verbose && logging.level > LogLevel::Debug {
        logging.level = LogLevel::Debug;
    }
    if let Err(e) = apfol_core::telemetry::init(&logging) {
        ctx.output.debug(&format!("Logging already initialized: {e}"));
    }
    tracing::debug!(config_path = ?ctx.config_path, "Configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Buy(args) => commands::buy::run(args, &ctx).await,
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Viewer(args) => commands::viewer::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
