// Command-line entry point.
// Retrieves one path from the configured server, falling back to the offline cache.

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing::error;
use tracing_subscriber::EnvFilter;

use webber::config::{SERVER_VAR, WebberConfig};
use webber::{AsyncOptions, Result, Webber};

/// Fetch a path from a server, caching the response for offline use.
#[derive(Debug, Parser)]
#[command(name = "webber", version)]
struct Cli {
    /// Path relative to the server, without a leading slash
    path: String,

    /// Server address (overrides WEBBER_SERVER)
    #[arg(long)]
    server: Option<String>,

    /// Decode the response as a JSON array
    #[arg(long)]
    json: bool,

    /// Read only from the offline cache
    #[arg(long, conflicts_with_all = ["no_cache", "offline_first"])]
    cache_only: bool,

    /// Neither read nor write the offline cache
    #[arg(long)]
    no_cache: bool,

    /// Print the cached value first, then the fresh one
    #[arg(long)]
    offline_first: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webber=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether any value was printed.
fn run(cli: &Cli) -> Result<bool> {
    let config = WebberConfig::from_lookup(|name| {
        if name == SERVER_VAR && cli.server.is_some() {
            return cli.server.clone();
        }
        std::env::var(name).ok()
    })?;
    let webber = Webber::from_config(&config);
    let cache = !cli.no_cache;

    if cli.offline_first {
        let runtime = tokio::runtime::Runtime::new()?;
        return Ok(runtime.block_on(offline_first(&webber, cli)));
    }

    let printed = match (cli.json, cli.cache_only) {
        (false, true) => print_text(webber.cache_get_from_api(&cli.path)),
        (false, false) => print_text(webber.get_from_api(&cli.path, cache)),
        (true, true) => print_array(webber.cache_get_json_array_from_api(&cli.path)),
        (true, false) => print_array(webber.get_json_array_from_api(&cli.path, cache)),
    };
    Ok(printed)
}

async fn offline_first(webber: &Webber, cli: &Cli) -> bool {
    let options = AsyncOptions::default().cache(!cli.no_cache);

    if cli.json {
        let mut pending = webber.async_get_json_array_from_api(&cli.path, options);
        let cached = print_array(pending.take_cached());
        print_array(pending.fresh().await) || cached
    } else {
        let mut pending = webber.async_get_from_api(&cli.path, options);
        let cached = print_text(pending.take_cached());
        print_text(pending.fresh().await) || cached
    }
}

fn print_text(text: Option<String>) -> bool {
    match text {
        Some(text) => {
            println!("{}", text);
            true
        }
        None => false,
    }
}

fn print_array(items: Option<Vec<Value>>) -> bool {
    match items {
        Some(items) => {
            let pretty =
                serde_json::to_string_pretty(&items).unwrap_or_else(|_| format!("{:?}", items));
            println!("{}", pretty);
            true
        }
        None => false,
    }
}
