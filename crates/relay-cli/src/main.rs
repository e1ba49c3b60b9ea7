//! Relay selector CLI
//!
//! Picks a WireGuard relay and endpoint from a relay list file.

mod config;
mod output;

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use relay_catalog::RelayCatalog;
use relay_selector::{RelayConstraints, RelaySelector};
use std::path::PathBuf;

use config::Config;
use output::{format_bridge, format_locations, format_selection, location_summary};

/// relay-select - pick a VPN relay and endpoint from a relay list
#[derive(Parser)]
#[command(name = "relay-select")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select a relay and endpoint
    Select {
        #[command(flatten)]
        filters: FilterArgs,

        /// Tunnel port (`any` or a number)
        #[arg(long)]
        port: Option<String>,

        /// Require DAITA-capable relays
        #[arg(long)]
        daita: bool,

        /// Number of consecutive failed connection attempts
        #[arg(long, default_value_t = 0)]
        failed_attempts: u32,

        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Select a Shadowsocks bridge close to the requested location
    Bridge {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List countries and cities with relay counts
    Locations {
        /// Relay list file (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Check a relay list for integrity problems
    Validate {
        /// Relay list file (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Options shared by the selecting subcommands
#[derive(Args)]
struct FilterArgs {
    /// Relay list file (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Location: `any`, `se`, `se-got` or `se-got-se9-wireguard`
    #[arg(short, long)]
    location: Option<String>,

    /// Ownership: `any`, `owned` or `rented`
    #[arg(long)]
    ownership: Option<String>,

    /// Providers: `any` or a comma separated list
    #[arg(long)]
    providers: Option<String>,

    /// Seed for reproducible selection
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    };

    // Validate configuration
    config.validate()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "debug"
        } else {
            config.logging.level.as_str()
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Select {
            filters,
            port,
            daita,
            failed_attempts,
            json,
        } => {
            let mut config = config;
            if let Some(port) = port {
                config.constraints.port = port;
            }
            config.constraints.daita |= daita;
            select_relay(&filters, failed_attempts, json, &config)?;
        }
        Commands::Bridge { filters } => {
            select_bridge(&filters, &config)?;
        }
        Commands::Locations { catalog } => {
            list_locations(catalog, &config)?;
        }
        Commands::Validate { catalog } => {
            validate_catalog(catalog, &config)?;
        }
    }

    Ok(())
}

/// Load the relay list named on the command line or in the config
fn load_catalog(path: Option<&PathBuf>, config: &Config) -> anyhow::Result<RelayCatalog> {
    let path = path.unwrap_or(&config.catalog.path);
    RelayCatalog::load(path)
        .map_err(|e| anyhow::anyhow!("Failed to load relay list {}: {}", path.display(), e))
}

/// Merge command line filters over the configured constraints
fn build_constraints(filters: &FilterArgs, config: &Config) -> anyhow::Result<RelayConstraints> {
    let mut constraints = config.constraints.clone();
    if let Some(location) = &filters.location {
        constraints.location = location.clone();
    }
    if let Some(ownership) = &filters.ownership {
        constraints.ownership = ownership.clone();
    }
    if let Some(providers) = &filters.providers {
        constraints.providers = providers.clone();
    }
    constraints.to_constraints()
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Select a relay and print it
fn select_relay(
    filters: &FilterArgs,
    failed_attempts: u32,
    json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let catalog = load_catalog(filters.catalog.as_ref(), config)?;
    let constraints = build_constraints(filters, config)?;
    let mut rng = make_rng(filters.seed);

    tracing::info!("Selecting relay ({})", constraints);

    let selected =
        RelaySelector::new(&catalog).evaluate(&constraints, failed_attempts, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        print!("{}", format_selection(&selected));
    }

    Ok(())
}

/// Select a bridge and print it
fn select_bridge(filters: &FilterArgs, config: &Config) -> anyhow::Result<()> {
    let catalog = load_catalog(filters.catalog.as_ref(), config)?;
    let constraints = build_constraints(filters, config)?;
    let mut rng = make_rng(filters.seed);

    let selector = RelaySelector::new(&catalog);
    let Some(bridge) = selector.closest_shadowsocks_relay(&constraints, &mut rng) else {
        anyhow::bail!("Relay list contains no active bridge");
    };
    let endpoint = selector.shadowsocks_tcp_bridge(&mut rng);

    print!("{}", format_bridge(bridge, endpoint));
    Ok(())
}

/// Print countries and cities
fn list_locations(path: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    let catalog = load_catalog(path.as_ref(), config)?;
    let summary = location_summary(&catalog);

    if summary.is_empty() {
        println!("No relays in relay list");
    } else {
        print!("{}", format_locations(&summary));
    }

    Ok(())
}

/// Print integrity problems, failing if there are any
fn validate_catalog(path: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    let catalog = load_catalog(path.as_ref(), config)?;
    let issues = catalog.validate();

    println!(
        "{} locations, {} WireGuard relays, {} port ranges, {} bridges",
        catalog.locations.len(),
        catalog.wireguard.relays.len(),
        catalog.wireguard.port_ranges.len(),
        catalog.bridge.relays.len()
    );

    if issues.is_empty() {
        println!("{}", console::style("Relay list OK").green());
        return Ok(());
    }

    for issue in &issues {
        println!("  {} {}", console::style("!").red(), issue);
    }
    anyhow::bail!("{} issue(s) found", issues.len());
}
