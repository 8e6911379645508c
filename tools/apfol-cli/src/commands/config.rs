//! Configuration management commands.

use anyhow::{bail, Context as _, Result};
use apfol_core::config::CONFIG_FILE_NAMES;
use apfol_core::AppConfig;
use console::Term;
use dialoguer::Input;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

/// Hide all but the last four characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{visible}")
    }
}

fn redacted(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    config.storefront.access_token = config.storefront.access_token.as_deref().map(mask);
    config
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = redacted(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    let mode = if config.storefront.credentials().is_some() {
        "remote"
    } else {
        "local"
    };
    ctx.output.kv("cart mode", mode);

    println!();
    println!("[storefront]");
    let unset = "(unset)".to_string();
    ctx.output
        .kv("domain", config.storefront.domain.as_ref().unwrap_or(&unset));
    ctx.output.kv(
        "access_token",
        config.storefront.access_token.as_ref().unwrap_or(&unset),
    );
    ctx.output.kv("api_version", &config.storefront.api_version);
    ctx.output
        .kv("timeout_ms", &config.storefront.timeout_ms.to_string());
    ctx.output
        .kv("max_retries", &config.storefront.max_retries.to_string());

    println!();
    println!("[catalog]");
    for product in ctx.catalog().products() {
        ctx.output.kv(
            &format!("{}_variant_id", product.handle),
            product.variant_id.as_str(),
        );
    }

    println!();
    println!("[storage]");
    ctx.output
        .kv("data_dir", &config.storage.data_dir().display().to_string());

    println!();
    println!("[logging]");
    ctx.output.kv("level", config.logging.level.as_str());
    ctx.output
        .kv("format", &format!("{:?}", config.logging.format).to_lowercase());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let mut config = AppConfig::default();
    if !ctx.output.is_json() && Term::stdout().is_term() {
        let domain: String = Input::new()
            .with_prompt("Shopify store domain (blank for local mode)")
            .allow_empty(true)
            .interact_text()?;
        if !domain.trim().is_empty() {
            let token: String = Input::new()
                .with_prompt("Storefront access token")
                .allow_empty(true)
                .interact_text()?;
            config.storefront.domain = Some(domain.trim().to_string());
            config.storefront.access_token =
                Some(token.trim().to_string()).filter(|t| !t.is_empty());
        }
    }

    config
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "created": config_path.display().to_string() }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("shpat_abcdef1234"), "****1234");
        assert_eq!(mask("abc"), "****");
    }

    #[test]
    fn test_redacted_keeps_other_fields() {
        let mut config = AppConfig::default();
        config.storefront.domain = Some("apfol.myshopify.com".to_string());
        config.storefront.access_token = Some("secret-token".to_string());

        let shown = redacted(&config);
        assert_eq!(shown.storefront.access_token.as_deref(), Some("****oken"));
        assert_eq!(shown.storefront.domain, config.storefront.domain);
    }
}
