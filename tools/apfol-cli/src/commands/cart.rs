//! Cart commands.

use anyhow::{bail, Result};
use apfol_cart::{CartOutcome, CartStore};
use apfol_commerce::checkout::CheckoutHandoff;
use apfol_commerce::LineItemId;
use dialoguer::Confirm;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let store = ctx.cart_store()?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show(&store, ctx).await,
        CartCommand::Add { variant, quantity } => {
            let variant_id = ctx.variant_for(&variant);
            let spinner = ctx.output.spinner(&format!("Adding {variant} to cart..."));
            let outcome = store.add_to_cart(&variant_id, quantity).await;
            spinner.finish_and_clear();
            report(outcome, &format!("Added {quantity} x {variant}"), &store, ctx)
        }
        CartCommand::Update { line, quantity } => {
            let spinner = ctx.output.spinner("Updating cart...");
            let outcome = store
                .update_quantity(&LineItemId::new(line.as_str()), quantity)
                .await;
            spinner.finish_and_clear();
            let msg = if quantity <= 0 {
                format!("Removed {line}")
            } else {
                format!("Set {line} to {quantity}")
            };
            report(outcome, &msg, &store, ctx)
        }
        CartCommand::Remove { line } => {
            let spinner = ctx.output.spinner("Removing from cart...");
            let outcome = store.remove_item(&LineItemId::new(line.as_str())).await;
            spinner.finish_and_clear();
            report(outcome, &format!("Removed {line}"), &store, ctx)
        }
        CartCommand::Clear { yes } => clear(yes, &store, ctx).await,
        CartCommand::Checkout => checkout(&store, ctx).await,
        CartCommand::Open => {
            store.init().await;
            store.open_cart();
            ctx.output.cart(&store.snapshot());
            Ok(())
        }
        CartCommand::Close => {
            store.init().await;
            store.close_cart();
            ctx.output.cart(&store.snapshot());
            Ok(())
        }
    }
}

async fn show(store: &CartStore, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading cart...");
    store.init().await;
    spinner.finish_and_clear();
    ctx.output.cart(&store.snapshot());
    Ok(())
}

fn report(outcome: CartOutcome, msg: &str, store: &CartStore, ctx: &Context) -> Result<()> {
    match outcome {
        CartOutcome::Updated => {
            ctx.output.success(msg);
            ctx.output.cart(&store.snapshot());
            Ok(())
        }
        CartOutcome::Unchanged(failure) => {
            if ctx.output.is_json() {
                ctx.output.json(&CartOutcome::Unchanged(failure.clone()));
            }
            bail!("Cart unchanged: {failure}")
        }
    }
}

async fn clear(yes: bool, store: &CartStore, ctx: &Context) -> Result<()> {
    store.init().await;
    let count = store.snapshot().item_count();
    if count == 0 {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {count} items from the cart?"))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Clearing cart...");
    let outcome = store.clear().await;
    spinner.finish_and_clear();

    let left = store.snapshot().item_count();
    if !outcome.is_updated() && left < count {
        ctx.output.warn(&format!(
            "Cleared {} of {count} items before the failure",
            count - left
        ));
    }
    report(outcome, "Cart cleared", store, ctx)
}

async fn checkout(store: &CartStore, ctx: &Context) -> Result<()> {
    store.init().await;
    if store.snapshot().item_count() == 0 {
        bail!("Your cart is empty");
    }

    let handoff = store.checkout().await;
    handoff_result(handoff, ctx)
}

/// Print a checkout handoff. An unavailable checkout is an error.
pub fn handoff_result(handoff: CheckoutHandoff, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&handoff);
    }
    match handoff {
        CheckoutHandoff::Redirect(url) => {
            ctx.output.success("Continue to checkout:");
            ctx.output.kv("url", &url);
            Ok(())
        }
        CheckoutHandoff::Unavailable(notice) => bail!(notice),
    }
}
