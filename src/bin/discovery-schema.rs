//! Discovery Schema CLI
//!
//! Command-line interface for syncing a schema registry from API discovery.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use discovery_schema::{
    add_discovery, fetch_snapshot, index_versions, DiscoveryClient, DiscoveryError, SchemaRecord,
    StaticDiscovery, SyncError,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "discovery-schema")]
#[command(about = "Build schema records from Kubernetes API discovery")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync pass and print the resulting schema registry
    Sync {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the effective preferred version of every group
    Versions {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Discovery snapshot file ({"groups": [...], "resources": [...]})
    #[arg(long, conflicts_with = "server", required_unless_present = "server")]
    snapshot: Option<PathBuf>,

    /// API server URL (http:// or https://)
    #[arg(
        long,
        conflicts_with = "snapshot",
        required_unless_present = "snapshot"
    )]
    server: Option<String>,

    /// Bearer token for the API server
    #[arg(long, env = "DISCOVERY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Sync { source, output } => run_sync(&source, &output),
        Commands::Versions { source, output } => run_versions(&source, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(source: &SourceArgs) -> Result<Box<dyn DiscoveryClient>, DiscoveryError> {
    if let Some(path) = &source.snapshot {
        return Ok(Box::new(StaticDiscovery::from_path(path)?));
    }
    remote_client(source)
}

#[cfg(feature = "remote")]
fn remote_client(source: &SourceArgs) -> Result<Box<dyn DiscoveryClient>, DiscoveryError> {
    use discovery_schema::{HttpConfig, HttpDiscovery};

    let server = source.server.clone().unwrap_or_default();
    let config = HttpConfig::new(server)
        .token(source.token.clone())
        .timeout(std::time::Duration::from_secs(source.timeout));
    Ok(Box::new(HttpDiscovery::new(config)?))
}

#[cfg(not(feature = "remote"))]
fn remote_client(source: &SourceArgs) -> Result<Box<dyn DiscoveryClient>, DiscoveryError> {
    Err(DiscoveryError::InvalidUrl {
        url: source.server.clone().unwrap_or_default(),
        message: "built without the `remote` feature".to_string(),
    })
}

fn run_sync(source: &SourceArgs, output: &OutputArgs) -> Result<(), u8> {
    let client = build_client(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    // Sorted by ID so output is stable.
    let mut schemas: BTreeMap<String, SchemaRecord> = BTreeMap::new();
    let status = match add_discovery(client.as_ref(), &mut schemas) {
        Ok(()) => Ok(()),
        Err(SyncError::Invalid { errors }) => {
            eprintln!("Some resource lists were skipped:");
            for error in &errors {
                eprintln!("  {}", error);
            }
            Err(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(e.exit_code() as u8);
        }
    };

    write_json(&schemas, output)?;
    status
}

fn run_versions(source: &SourceArgs, output: &OutputArgs) -> Result<(), u8> {
    let client = build_client(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let snapshot = fetch_snapshot(client.as_ref()).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let versions: BTreeMap<String, String> = index_versions(&snapshot.groups).into_iter().collect();
    write_json(&versions, output)
}

fn write_json<T: Serialize>(value: &T, output: &OutputArgs) -> Result<(), u8> {
    let json_output = if output.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match &output.output {
        Some(path) => {
            std::fs::write(path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}
