//! remodel CLI
//!
//! Command-line front end: fetch, create and delete remote resources
//! described by a schema file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use remodel_core::{Config, HttpTransport, Schema, Syncer};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "remodel")]
#[command(about = "remodel - sync JSON REST resources into local records")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ~/.config/remodel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Schema file describing the entity types
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch records of an entity type
    Fetch {
        /// Entity type name
        entity: String,
        /// Location to fetch instead of the collection
        #[arg(long)]
        location: Option<String>,
        /// Query parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Fetch one record by id
    Get {
        /// Entity type name
        entity: String,
        /// Remote id
        id: i64,
    },
    /// Create a record from a JSON file
    #[command(alias = "add")]
    Create {
        /// Entity type name
        entity: String,
        /// JSON object with the record's fields
        file: PathBuf,
    },
    /// Delete a record by id
    #[command(alias = "rm")]
    Delete {
        /// Entity type name
        entity: String,
        /// Remote id
        id: i64,
        /// Remove the local copy even if the server refuses
        #[arg(long)]
        force: bool,
    },
    /// Show registered entity types
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_logging(&config, cli.verbose);

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let schema_path = cli
        .schema
        .or_else(|| config.schema_path.clone())
        .context("No schema file. Pass --schema or set schema_path in the config file")?;
    let schema = Schema::load(&schema_path)?.with_default_base_url(config.base_url.clone());

    match cli.command {
        Commands::Schema => commands::schema::show(&schema, &output),
        Commands::Fetch {
            entity,
            location,
            params,
        } => {
            let mut syncer = connect(schema, &config)?;
            commands::fetch::fetch(&mut syncer, &entity, location.as_deref(), params, &output)
                .await
        }
        Commands::Get { entity, id } => {
            let mut syncer = connect(schema, &config)?;
            commands::fetch::get(&mut syncer, &entity, id, &output).await
        }
        Commands::Create { entity, file } => {
            let mut syncer = connect(schema, &config)?;
            commands::create::create(&mut syncer, &entity, &file, &output).await
        }
        Commands::Delete { entity, id, force } => {
            let mut syncer = connect(schema, &config)?;
            commands::delete::delete(&mut syncer, &entity, id, force, &output).await
        }
    }
}

/// Syncer over HTTP for the commands that reach the server
fn connect(schema: Schema, config: &Config) -> Result<Syncer<HttpTransport>> {
    let transport = HttpTransport::new(config)?;
    Ok(Syncer::new(schema, transport))
}

/// Log to stderr: RUST_LOG, else the configured level, else warnings only
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.log_level.as_deref().unwrap_or("warn"))
        })
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse a `key=value` query parameter
fn parse_param(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", input)),
    }
}
