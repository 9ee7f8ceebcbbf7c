//! Command-line front end for the melodico enrichment engine.
//!
//! Two subcommands wrap the row imputers: `artists` enriches the artist
//! dataset from the knowledge graph and `tracks` fills track metadata from
//! the recording catalogue. The CSV layer lives here — the engine crates
//! only ever see [`Dataset`](melodico_core::Dataset) values.

#![forbid(unsafe_code)]

mod dataset;
mod error;

use std::collections::BTreeMap;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use log::info;
use melodico_core::{EntitySource, RecordingSource};
use melodico_data::{
    DEFAULT_USER_AGENT, KnowledgeClient, KnowledgeClientConfig, RecordingClient,
    RecordingClientConfig,
};
use melodico_gazetteer::RegionVocabulary;
use melodico_imputer::{
    ArtistImputer, ArtistImputerConfig, AuditLog, ImputeSummary, TrackImputer, TrackImputerConfig,
};

pub use dataset::{DatasetError, load_dataset, save_dataset};
pub use error::CliError;

/// Run the melodico CLI with the current process arguments.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Artists(args) => run_artists(&args),
        Command::Tracks(args) => run_tracks(&args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "melodico",
    about = "Enrich artist and track datasets from remote knowledge sources",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enrich the artist dataset from the knowledge graph.
    Artists(ArtistArgs),
    /// Enrich the track dataset from the recording catalogue.
    Tracks(TrackArgs),
}

#[derive(Debug, Args)]
struct ArtistArgs {
    /// Input CSV path
    #[arg(short, long, value_name = "path")]
    input: Utf8PathBuf,
    /// Output CSV path
    #[arg(short, long, value_name = "path")]
    output: Utf8PathBuf,
    /// JSON object mapping identity ids to encyclopedia page titles
    #[arg(short = 't', long = "titles", value_name = "path")]
    title_mapping: Utf8PathBuf,
    /// Append audit entries to this JSONL file
    #[arg(short = 'l', long = "log", value_name = "path")]
    audit_log: Option<Utf8PathBuf>,
    /// Field delimiter of the input and output files
    #[arg(long, default_value = ";", value_name = "char")]
    delimiter: String,
    /// Overwrite populated cells instead of filling only missing ones
    #[arg(long)]
    overwrite: bool,
    /// Override the page-props lookup endpoint (for testing)
    #[arg(long, value_name = "url")]
    search_endpoint: Option<String>,
    /// Override the entity-data endpoint (for testing)
    #[arg(long, value_name = "url")]
    entity_endpoint: Option<String>,
    /// Custom HTTP user agent string
    #[arg(long, value_name = "agent", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

#[derive(Debug, Args)]
struct TrackArgs {
    /// Input CSV path
    #[arg(short, long, value_name = "path")]
    input: Utf8PathBuf,
    /// Output CSV path
    #[arg(short, long, value_name = "path")]
    output: Utf8PathBuf,
    /// Append audit entries to this JSONL file
    #[arg(short = 'l', long = "log", value_name = "path")]
    audit_log: Option<Utf8PathBuf>,
    /// Field delimiter of the input and output files
    #[arg(long, default_value = ",", value_name = "char")]
    delimiter: String,
    /// Overwrite populated cells instead of filling only missing ones
    #[arg(long)]
    overwrite: bool,
    /// Override the recording-search endpoint (for testing)
    #[arg(long, value_name = "url")]
    endpoint: Option<String>,
    /// Minimum spacing between catalogue requests, in milliseconds
    #[arg(long, value_name = "ms", default_value_t = 1100)]
    interval_ms: u64,
    /// Custom HTTP user agent string
    #[arg(long, value_name = "agent", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

fn run_artists(args: &ArtistArgs) -> Result<(), CliError> {
    let mut config = KnowledgeClientConfig::default().with_user_agent(args.user_agent.clone());
    if let Some(endpoint) = &args.search_endpoint {
        config = config.with_search_endpoint(endpoint.clone());
    }
    if let Some(endpoint) = &args.entity_endpoint {
        config = config.with_entity_endpoint(endpoint.clone());
    }
    let client = KnowledgeClient::with_config(config)?;
    let summary = enrich_artists(args, client)?;
    info!(
        "enriched {} of {} artist rows",
        summary.rows_changed, summary.rows
    );
    Ok(())
}

fn run_tracks(args: &TrackArgs) -> Result<(), CliError> {
    let mut config = RecordingClientConfig::default()
        .with_user_agent(args.user_agent.clone())
        .with_request_interval(Duration::from_millis(args.interval_ms));
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    let client = RecordingClient::with_config(config)?;
    let summary = enrich_tracks(args, client)?;
    info!(
        "enriched {} of {} track rows",
        summary.rows_changed, summary.rows
    );
    Ok(())
}

fn enrich_artists<S: EntitySource>(
    args: &ArtistArgs,
    source: S,
) -> Result<ImputeSummary, CliError> {
    let delimiter = parse_delimiter(&args.delimiter)?;
    let mapping = load_title_mapping(&args.title_mapping)?;
    let config = ArtistImputerConfig::default()
        .with_title_mapping(mapping)
        .with_overwrite(args.overwrite);
    let mut imputer = ArtistImputer::new(source, RegionVocabulary::italian(), config);
    if let Some(path) = &args.audit_log {
        imputer = imputer.with_audit_log(AuditLog::new(path.clone()));
    }
    let mut dataset = load_dataset(&args.input, delimiter)?;
    let summary = imputer.impute(&mut dataset)?;
    save_dataset(&dataset, &args.output, delimiter)?;
    Ok(summary)
}

fn enrich_tracks<S: RecordingSource>(
    args: &TrackArgs,
    source: S,
) -> Result<ImputeSummary, CliError> {
    let delimiter = parse_delimiter(&args.delimiter)?;
    let config = TrackImputerConfig::default().with_overwrite(args.overwrite);
    let mut imputer = TrackImputer::new(source, config);
    if let Some(path) = &args.audit_log {
        imputer = imputer.with_audit_log(AuditLog::new(path.clone()));
    }
    let mut dataset = load_dataset(&args.input, delimiter)?;
    let summary = imputer.impute(&mut dataset)?;
    save_dataset(&dataset, &args.output, delimiter)?;
    Ok(summary)
}

fn parse_delimiter(raw: &str) -> Result<u8, CliError> {
    match raw.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(CliError::InvalidDelimiter {
            raw: raw.to_owned(),
        }),
    }
}

fn load_title_mapping(path: &Utf8Path) -> Result<BTreeMap<String, String>, CliError> {
    let contents =
        std::fs::read_to_string(path.as_std_path()).map_err(|source| CliError::TitleMappingRead {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| CliError::TitleMappingParse {
        path: path.to_path_buf(),
        source,
    })
}
