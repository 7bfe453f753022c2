//! Portal CLI - catalog-driven web app launcher shell

use std::sync::Arc;

use clap::{Parser, Subcommand};
use portal_core::api::{self, ChannelTransport, UiEvent, UiRequest};
use portal_core::args::parse_web_app_args;
use portal_core::config::Config;
use portal_core::dispatch::{DispatchOutcome, Dispatcher};
use portal_core::launch::LaunchRequest;
use portal_core::launcher::external::ExternalLauncher;
use portal_core::launcher::{LaunchOutcome, Launcher, LauncherStrategy};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

#[derive(Parser)]
#[command(name = "portal")]
#[command(author, version, about = "Catalog-driven web app launcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the catalog listing
    List,

    /// Fetch one catalog entry and dispatch it
    Open {
        /// Catalog entry id (e.g. "calc.app")
        entry_id: String,
    },

    /// Dispatch the fixed single-entry launch
    Sol,

    /// Show the picker and dispatch selections interactively (default)
    Pick,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portal=info".parse()?),
        )
        .init();

    // The direct web-app grammar is checked before clap ever sees argv:
    // `portal --webAPP ...` bypasses the picker entirely
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(request) = parse_web_app_args(&raw_args) {
        return cmd_direct_launch(request).await;
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => cmd_list(cli.format).await,
        Some(Commands::Open { entry_id }) => cmd_open(&entry_id, cli.quiet).await,
        Some(Commands::Sol) => cmd_sol(cli.quiet).await,
        Some(Commands::Pick) | None => cmd_pick(cli.quiet).await,
        Some(Commands::Config { action }) => cmd_config(action, cli.quiet),
        Some(Commands::Doctor) => cmd_doctor(cli.quiet).await,
    }
}

/// Build the launcher the configuration asks for
///
/// The CLI links no GUI toolkit, so the embedded-window strategy has no
/// window host here; shells that embed portal-core provide their own. When
/// the config selects it anyway, fall back to the external strategy.
fn build_launcher(config: &Config) -> Arc<dyn Launcher> {
    if config.launcher.strategy == LauncherStrategy::Embedded {
        warn!("No embedded window host in the CLI; using the external strategy");
    }
    Arc::new(ExternalLauncher::with_candidates(
        config.launcher.browser_candidates.clone(),
        config.launcher.user_data_dir.clone(),
    ))
}

fn build_dispatcher(config: &Config) -> Dispatcher {
    Dispatcher::new(
        Arc::new(portal_core::catalog::CatalogClient::with_host(
            config.catalog.host.as_str(),
        )),
        build_launcher(config),
        config.dispatch.mode,
        config.dispatch.sol_entry.clone(),
    )
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_direct_launch(request: LaunchRequest) -> anyhow::Result<()> {
    let config = Config::load()?;
    let launcher = build_launcher(&config);

    // Direct launch is terminal either way; failures were already logged
    launcher.launch(&request).await?;
    Ok(())
}

async fn cmd_list(format: OutputFormat) -> anyhow::Result<()> {
    let config = Config::load()?;
    let dispatcher = build_dispatcher(&config);

    let (transport, mut rx) = ChannelTransport::new();
    dispatcher.publish_listing(&transport).await;

    match rx.try_recv() {
        Ok(UiEvent::AppsData { listing }) => match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
            OutputFormat::Text => print_listing(&listing),
        },
        Err(_) => {
            println!("No catalog listing available.");
            println!("\nCheck the host with: portal config get catalog.host");
        }
    }
    Ok(())
}

async fn cmd_open(entry_id: &str, quiet: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let dispatcher = build_dispatcher(&config);

    let request = UiRequest::OpenApp {
        entry_id: entry_id.to_string(),
    };
    let outcome = api::handle_request(&dispatcher, request).await;
    report_outcome(entry_id, outcome, quiet);
    Ok(())
}

async fn cmd_sol(quiet: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let dispatcher = build_dispatcher(&config);

    let outcome = api::handle_request(&dispatcher, UiRequest::OpenSolApp).await;
    report_outcome(&config.dispatch.sol_entry, outcome, quiet);
    Ok(())
}

async fn cmd_pick(quiet: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let dispatcher = build_dispatcher(&config);

    // One listing fetch per picker session, pushed over the UI transport
    let (transport, mut rx) = ChannelTransport::new();
    dispatcher.publish_listing(&transport).await;

    let entries = match rx.try_recv() {
        Ok(UiEvent::AppsData { listing }) => listing_entries(&listing),
        Err(_) => Vec::new(),
    };

    if entries.is_empty() {
        println!("No apps available.");
        println!("\nCheck the host with: portal config get catalog.host");
        return Ok(());
    }

    if !quiet {
        println!("Available apps:");
        for (index, (_, label)) in entries.iter().enumerate() {
            println!("  {}. {}", index + 1, label);
        }
        println!("\nPick a number or entry id; 'q' quits.");
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("portal> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "q" || input == "quit" {
            break;
        }
        editor.add_history_entry(input)?;

        let entry_id = match input.parse::<usize>() {
            Ok(number) if (1..=entries.len()).contains(&number) => entries[number - 1].0.clone(),
            Ok(_) => {
                println!("Pick a number between 1 and {}.", entries.len());
                continue;
            }
            // Anything non-numeric is taken as a raw entry id
            Err(_) => input.to_string(),
        };

        let request = UiRequest::OpenApp {
            entry_id: entry_id.clone(),
        };
        let outcome = api::handle_request(&dispatcher, request).await;
        report_outcome(&entry_id, outcome, quiet);

        // A successful hand-off replaces the shell
        if outcome == DispatchOutcome::Launched(LaunchOutcome::HandedOff)
            && config.launcher.exit_on_handoff
        {
            break;
        }
    }

    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Portal Health Check");
        println!("===================");
        println!();
    }

    let mut all_ok = true;

    // Check configuration
    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
            println!("Some checks failed. See above for details.");
            return Ok(());
        }
    };

    // Check config file location
    if !quiet {
        match Config::config_path() {
            Ok(path) => {
                if path.exists() {
                    println!("[OK] Config file: {}", path.display());
                } else {
                    println!("[--] Config file: {} (using defaults)", path.display());
                }
            }
            Err(e) => {
                println!("[!!] Config file: Error - {}", e);
            }
        }
    }

    // Check browser availability
    use portal_core::launcher::external::{BrowserLocator, KnownPathLocator};
    let locator = KnownPathLocator::new(config.launcher.browser_candidates.clone());
    match locator.locate() {
        Some(path) => {
            if !quiet {
                println!("[OK] Browser: {}", path.display());
            }
        }
        None => {
            all_ok = false;
            if !quiet {
                println!("[!!] Browser: none of the probed paths is executable");
                println!("     Set launcher.browser_candidates in the config");
            }
        }
    }

    // Check catalog host
    let catalog = portal_core::catalog::CatalogClient::with_host(config.catalog.host.as_str());
    match catalog.fetch_listing().await {
        Ok(listing) => {
            if !quiet {
                println!("[OK] Catalog: {}", config.catalog.host);
                println!("     Apps: {}", listing_entries(&listing).len());
            }
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Catalog: {} - {}", config.catalog.host, e);
            }
        }
    }

    // Summary
    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    Ok(())
}

// ============================================================================
// Listing helpers
// ============================================================================

/// Flatten the opaque listing JSON into (entry id, display label) pairs
///
/// The hosted catalog serves an array of objects; strings and unknown
/// shapes degrade to using their text as both id and label.
fn listing_entries(listing: &serde_json::Value) -> Vec<(String, String)> {
    let items: Vec<&serde_json::Value> = match listing {
        serde_json::Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some((s.clone(), s.clone())),
            serde_json::Value::Object(map) => {
                let id = ["id", "app", "entry", "file"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(|v| v.as_str()))?
                    .to_string();
                let label = ["name", "title"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
                    .unwrap_or(&id)
                    .to_string();
                Some((id, label))
            }
            _ => None,
        })
        .collect()
}

fn print_listing(listing: &serde_json::Value) {
    let entries = listing_entries(listing);
    if entries.is_empty() {
        println!("Catalog listing is empty.");
        return;
    }
    println!("Apps:");
    for (id, label) in entries {
        if id == label {
            println!("  {}", id);
        } else {
            println!("  {} - {}", id, label);
        }
    }
}

fn report_outcome(entry_id: &str, outcome: DispatchOutcome, quiet: bool) {
    if quiet {
        return;
    }
    match outcome {
        DispatchOutcome::Launched(LaunchOutcome::Window) => {
            println!("Opened '{}' in an embedded window.", entry_id);
        }
        DispatchOutcome::Launched(LaunchOutcome::HandedOff) => {
            println!("Handed '{}' off to the system browser.", entry_id);
        }
        DispatchOutcome::Launched(LaunchOutcome::Aborted) | DispatchOutcome::Nothing => {
            println!("Nothing launched for '{}'.", entry_id);
        }
        DispatchOutcome::RawExecuted => {
            println!("Executed raw descriptor for '{}'.", entry_id);
        }
    }
}
