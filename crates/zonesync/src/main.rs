//! Command-line entry point for **zonesync**
//!
//! * Parses a single `--config` option (or `ZONESYNC_CONFIG` env var)
//! * Sets up tracing with a compact formatter
//! * Maps each subcommand onto one lifecycle operation of the zone
//!   resource adapter and prints the resulting state as JSON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use zonesync_core::{AppConfig, ZONE_RESOURCE, ZoneState, build_registry, load_config};

/// CLI options
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the config file (optional; environment variables are used if absent)
    #[arg(short, long, env = "ZONESYNC_CONFIG", default_value = "zonesync.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the declared zone and print its refreshed state
    Create { domain: String },
    /// Refresh a managed zone by identifier
    Read { zone_id: String },
    /// Apply the declared plan tier to a managed zone
    Update { zone_id: String, domain: String },
    /// Delete a managed zone by identifier
    Delete { zone_id: String },
    /// Adopt an existing remote zone under the declared block
    Import { domain: String, zone_id: String },
}

/// Seed a state record from the `[[zone]]` block declaring `domain`.
fn declared_state(cfg: &AppConfig, domain: &str) -> Result<ZoneState> {
    let z = cfg
        .zone(domain)
        .with_context(|| format!("no [[zone]] block declares `{domain}`"))?;
    let mut state = ZoneState::new(&z.domain);
    state.jump_start = z.jump_start;
    state.organization_id = z.organization_id.clone();
    state.plan = z.plan;
    Ok(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().compact())
        .init();

    let cfg = load_config(&cli.config)?;
    let registry = build_registry(&cfg)?;
    let adapter = registry
        .get(ZONE_RESOURCE)
        .context("zone adapter not registered")?;

    let state = match cli.command {
        Command::Create { domain } => {
            let mut state = declared_state(&cfg, &domain)?;
            adapter.create(&mut state).await?;
            Some(state)
        }
        Command::Read { zone_id } => {
            let mut state = ZoneState::new("");
            state.id = Some(zone_id.clone());
            adapter.read(&mut state).await?;
            if state.id.is_none() {
                info!("zone {zone_id} no longer exists remotely; drop it from local state");
                None
            } else {
                Some(state)
            }
        }
        Command::Update { zone_id, domain } => {
            let mut state = declared_state(&cfg, &domain)?;
            state.id = Some(zone_id);
            adapter.update(&mut state).await?;
            Some(state)
        }
        Command::Delete { zone_id } => {
            adapter.delete(&zone_id).await?;
            info!("zone {zone_id} removed from remote; drop it from local state");
            None
        }
        Command::Import { domain, zone_id } => {
            let mut state = declared_state(&cfg, &domain)?;
            state.id = Some(zone_id);
            adapter.import(&mut state).await?;
            Some(state)
        }
    };

    if let Some(state) = state {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    Ok(())
}
