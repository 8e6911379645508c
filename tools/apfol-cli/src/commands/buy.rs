//! Buy-now checkout.

use anyhow::Result;

use super::cart::handoff_result;
use super::BuyArgs;
use crate::context::Context;

/// Run the buy command.
pub async fn run(args: BuyArgs, ctx: &Context) -> Result<()> {
    let store = ctx.cart_store()?;
    let variant_id = ctx.variant_for(&args.variant);
    ctx.output
        .debug(&format!("Buying {} x {}", args.quantity, variant_id));

    let spinner = ctx.output.spinner("Creating checkout...");
    let handoff = store.buy_now(&variant_id, args.quantity).await;
    spinner.finish_and_clear();

    handoff_result(handoff?, ctx)
}
