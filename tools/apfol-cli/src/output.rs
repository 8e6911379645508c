//! Output formatting for the CLI.

use apfol_cart::CartView;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Create a spinner for a network round trip.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(spinner_style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Render the cart, as the drawer would.
    pub fn cart(&self, view: &CartView) {
        if self.json {
            self.json(view);
            return;
        }

        let Some(cart) = &view.cart else {
            self.info("Cart not loaded");
            return;
        };

        let mode = view.mode.map_or("unknown".to_string(), |m| m.to_string());
        let drawer = if view.ui.is_cart_open { "open" } else { "closed" };
        self.header(&format!("Cart ({mode}, drawer {drawer})"));

        if cart.is_empty() {
            self.info("Your cart is empty");
            return;
        }

        let widths = [36, 16, 5, 10, 10];
        self.table_row(&["LINE", "PRODUCT", "QTY", "PRICE", "TOTAL"], &widths);
        for item in &cart.line_items {
            let total = item
                .line_total()
                .map(|m| m.display())
                .unwrap_or_else(|_| "-".to_string());
            self.table_row(
                &[
                    item.id.as_str(),
                    &item.title,
                    &item.quantity.to_string(),
                    &item.variant.unit_price.display(),
                    &total,
                ],
                &widths,
            );
        }

        println!();
        self.kv("items", &cart.line_item_count.to_string());
        self.kv("subtotal", &cart.subtotal_price.display());
        if cart.discount_amount.is_positive() {
            self.kv(
                "bundle discount",
                &style(format!("-{}", cart.discount_amount.display()))
                    .green()
                    .to_string(),
            );
        }
        self.kv("total", &style(cart.total_price.display()).bold().to_string());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}
