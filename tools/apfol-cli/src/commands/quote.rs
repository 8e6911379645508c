//! Product page price preview.

use anyhow::{anyhow, Context as _, Result};
use serde::Serialize;

use super::QuoteArgs;
use crate::context::Context;
use apfol_commerce::cart::PriceQuote;

#[derive(Serialize)]
struct QuoteReport<'a> {
    handle: &'a str,
    title: &'a str,
    promotion: Option<String>,
    #[serde(flatten)]
    quote: PriceQuote,
}

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog();
    let product = catalog.by_handle(&args.handle).ok_or_else(|| {
        let known: Vec<&str> = catalog.products().iter().map(|p| p.handle.as_str()).collect();
        anyhow!(
            "Unknown product '{}'. Available: {}",
            args.handle,
            known.join(", ")
        )
    })?;

    let quote = product
        .quote(args.quantity)
        .with_context(|| format!("Cannot quote {} units", args.quantity))?;

    if ctx.output.is_json() {
        ctx.output.json(&QuoteReport {
            handle: &product.handle,
            title: &product.title,
            promotion: product.quote_rule.label(),
            quote,
        });
        return Ok(());
    }

    ctx.output
        .header(&format!("{} x {}", quote.quantity, product.title));
    if let Some(label) = product.quote_rule.label() {
        ctx.output.kv("promotion", &label);
    }
    ctx.output.kv("price", &quote.price.display());
    if quote.savings.is_positive() {
        ctx.output.kv("compare at", &quote.compare_at.display());
        ctx.output.kv(
            "you save",
            &format!("{} ({}%)", quote.savings.display(), quote.savings_percent),
        );
    }
    Ok(())
}
