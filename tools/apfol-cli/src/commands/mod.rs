//! CLI command implementations.

pub mod buy;
pub mod cart;
pub mod config;
pub mod quote;
pub mod viewer;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product handle or variant id.
        variant: String,
        /// Units to add.
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set a line's quantity. Zero or less removes it.
    Update {
        /// Line item id.
        line: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Line item id.
        line: String,
    },
    /// Remove every line.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Start checkout for the cart.
    Checkout,
    /// Open the cart drawer.
    Open,
    /// Close the cart drawer.
    Close,
}

/// Arguments for the buy command.
#[derive(Args)]
pub struct BuyArgs {
    /// Product handle or variant id.
    pub variant: String,

    /// Units to buy.
    #[arg(short, long, default_value = "1")]
    pub quantity: i64,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Product handle.
    pub handle: String,

    /// Units to quote.
    #[arg(short, long, default_value = "1")]
    pub quantity: i64,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the viewer command.
#[derive(Args)]
pub struct ViewerArgs {
    /// Frames to simulate.
    #[arg(short, long, default_value = "60")]
    pub frames: u32,

    /// Scroll progress values, one per frame from the first frame on.
    #[arg(short, long)]
    pub scroll: Vec<f64>,

    /// Horizontal drag in pixels, starting after the scroll values.
    #[arg(long, allow_negative_numbers = true)]
    pub drag: Option<f64>,

    /// Milliseconds between frames.
    #[arg(long, default_value = "16")]
    pub frame_ms: u64,

    /// Ignore pointer input.
    #[arg(long)]
    pub no_interaction: bool,

    /// Print every Nth frame.
    #[arg(long, default_value = "10")]
    pub every: u32,
}
