//! # cart-cli
//!
//! Shows the current cart or checks it out against a storefront backend.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart-cli show [--json]                                                 │
//! │      open the store, print lines and totals                             │
//! │                                                                         │
//! │  cart-cli checkout --user-info '{"nome":"Ana"}'                         │
//! │           [--increase ID]... [--decrease ID]...                         │
//! │           [--remove ID]...   [--note ID=TEXT]... [--json]               │
//! │      open the store, apply edits in that order, submit                  │
//! │                                                                         │
//! │  Global: --config <PATH>  --api-url <URL>                               │
//! │  Exit status is non-zero when loading or checkout fails.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use storefront_client::config::DisplaySettings;
use storefront_client::{
    CartEventEmitter, CartSnapshot, CartStore, CartStoreBuilder, ErrorKind, StorefrontConfig,
};
use storefront_core::LineId;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cart-cli", about = "Inspect and check out a storefront cart", version)]
struct Cli {
    /// Path to storefront.toml (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Render output as pretty JSON
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Edit the cart and place the order
    Checkout(CheckoutArgs),
}

#[derive(Args)]
struct CheckoutArgs {
    /// Customer details sent with the order, as a JSON value
    #[arg(long, value_parser = parse_user_info)]
    user_info: Value,

    /// Add one to a line's quantity (repeatable)
    #[arg(long = "increase", value_name = "ID")]
    increase: Vec<LineId>,

    /// Take one from a line's quantity (repeatable)
    #[arg(long = "decrease", value_name = "ID")]
    decrease: Vec<LineId>,

    /// Remove a line (repeatable)
    #[arg(long = "remove", value_name = "ID")]
    remove: Vec<LineId>,

    /// Set a line's note (repeatable)
    #[arg(long = "note", value_name = "ID=TEXT", value_parser = parse_note)]
    note: Vec<(LineId, String)>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let store = CartStoreBuilder::from_config(&config)
        .context("failed to set up the cart backend")?
        .with_emitter(Arc::new(LogEmitter))
        .open()
        .await;

    let result = match cli.command {
        Commands::Show => show(&store, &config.display, cli.json),
        Commands::Checkout(args) => checkout(&store, &config.display, args, cli.json).await,
    };

    store.close();
    result
}

/// Initializes tracing, writing to stderr so stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<StorefrontConfig> {
    // A broken config file is logged and replaced by defaults; --api-url can still fix it up.
    let mut config = StorefrontConfig::load_or_default(cli.config.clone());

    if let Some(ref url) = cli.api_url {
        config.api.base_url = url.clone();
        config.validate().context("invalid --api-url")?;
    }

    info!(base_url = %config.api.base_url, locale = %config.messages.locale, "Configuration loaded");
    Ok(config)
}

// =============================================================================
// Commands
// =============================================================================

fn show(store: &CartStore, display: &DisplaySettings, json: bool) -> Result<()> {
    let snapshot = store.snapshot();

    if json {
        print_json(&snapshot)?;
    } else if snapshot.fetch_error_message.is_empty() {
        render_cart(&snapshot, display);
    }

    if !snapshot.fetch_error_message.is_empty() {
        bail!("{}", snapshot.fetch_error_message);
    }
    Ok(())
}

async fn checkout(
    store: &CartStore,
    display: &DisplaySettings,
    args: CheckoutArgs,
    json: bool,
) -> Result<()> {
    let loaded = store.snapshot();
    if !loaded.fetch_error_message.is_empty() {
        if json {
            print_json(&loaded)?;
        }
        bail!("{}", loaded.fetch_error_message);
    }

    apply_edits(store, &args);

    let outcome = store.checkout(args.user_info).await;
    debug!(?outcome, "Checkout finished");
    let snapshot = store.snapshot();

    if json {
        print_json(&snapshot)?;
    }

    if !snapshot.checkout_error_message.is_empty() {
        bail!("{}", snapshot.checkout_error_message);
    }

    if !json {
        render_cart(&snapshot, display);
        println!("Order placed: {}", snapshot.order_id);
    }
    Ok(())
}

/// Applies edits in a fixed order: increases, decreases, removals, notes.
fn apply_edits(store: &CartStore, args: &CheckoutArgs) {
    let skipped = |edit: &str, id: LineId| {
        warn!(edit, line_id = id, "No cart line with this id, edit skipped");
    };

    for &id in &args.increase {
        if !store.increase_quantity(id) {
            skipped("increase", id);
        }
    }
    for &id in &args.decrease {
        if !store.decrease_quantity(id) {
            skipped("decrease", id);
        }
    }
    for &id in &args.remove {
        if !store.delete_line(id) {
            skipped("remove", id);
        }
    }
    for (id, text) in &args.note {
        if !store.set_note(*id, text.as_str()) {
            skipped("note", *id);
        }
    }
}

// =============================================================================
// Output
// =============================================================================

fn print_json(snapshot: &CartSnapshot) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}

fn render_cart(snapshot: &CartSnapshot, display: &DisplaySettings) {
    if snapshot.cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in snapshot.cart.lines() {
        println!(
            "- [{}] {} x{} ({}) {} each, {}",
            line.id,
            line.name,
            line.quantity,
            line.sku,
            display.format_money(line.unit_price),
            display.format_money(line.line_total())
        );
        if !line.note.is_empty() {
            println!("    note: {}", line.note);
        }
    }

    println!(
        "{} line(s), {} item(s), subtotal {}",
        snapshot.totals.line_count,
        snapshot.totals.total_quantity,
        display.format_money(snapshot.totals.subtotal)
    );
}

/// Logs store events; the terminal output is printed from snapshots instead.
struct LogEmitter;

impl CartEventEmitter for LogEmitter {
    fn emit_snapshot(&self, snapshot: &CartSnapshot) {
        debug!(
            lines = snapshot.totals.line_count,
            loading = snapshot.loading,
            "Cart state changed"
        );
    }

    fn emit_error(&self, kind: ErrorKind, message: &str) {
        warn!(%kind, message, "Cart request failed");
    }
}

// =============================================================================
// Argument Parsers
// =============================================================================

fn parse_user_info(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("--user-info must be valid JSON")
}

fn parse_note(raw: &str) -> Result<(LineId, String)> {
    let (id, text) = raw
        .split_once('=')
        .context("expected ID=TEXT, e.g. 5=no onions")?;
    let id = id
        .trim()
        .parse::<LineId>()
        .with_context(|| format!("invalid line id '{}'", id))?;
    Ok((id, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_note_keeps_text() {
        assert_eq!(parse_note("5=no onions").unwrap(), (5, "no onions".to_string()));
        assert_eq!(parse_note("7= a=b ").unwrap(), (7, " a=b ".to_string()));
        assert_eq!(parse_note("3=").unwrap(), (3, String::new()));

        assert!(parse_note("no-equals").is_err());
        assert!(parse_note("x=text").is_err());
    }

    #[test]
    fn test_checkout_args() {
        let cli = Cli::try_parse_from([
            "cart-cli",
            "--api-url",
            "http://localhost:8080/",
            "checkout",
            "--user-info",
            r#"{"nome":"Ana"}"#,
            "--increase",
            "1",
            "--increase",
            "2",
            "--note",
            "1=sem cebola",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080/"));
        match cli.command {
            Commands::Checkout(args) => {
                assert_eq!(args.user_info["nome"], "Ana");
                assert_eq!(args.increase, vec![1, 2]);
                assert!(args.decrease.is_empty());
                assert_eq!(args.note, vec![(1, "sem cebola".to_string())]);
            }
            Commands::Show => panic!("expected checkout"),
        }
    }

    #[test]
    fn test_rejects_bad_user_info() {
        let result = Cli::try_parse_from(["cart-cli", "checkout", "--user-info", "{nope"]);
        assert!(result.is_err());
    }
}
