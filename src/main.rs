use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use serde_json::Value;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use docref::config::{get_config_path, load_config, save_config, DocRefConfig};
use docref::errors::{DocRefError, Result};
use docref::merge::merge_document_sets;
use docref::normalize::extract_document_set;
use docref::resolution::ReferenceResolver;
use docref::sources::gather_kyc_documents;
use docref::storage::FirebaseStorageResolver;
use docref::types::{NormalizedDocumentSet, RawDocumentSet};

/// Resolve stored KYC document references into download URLs.
#[derive(Parser)]
#[command(name = "docref", about = "Resolve stored KYC document references")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a configuration file for a storage bucket
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Storage bucket name
        #[arg(short, long)]
        bucket: String,
        /// Storage REST endpoint
        #[arg(short, long)]
        endpoint: Option<String>,
    },
    /// Extract document references from a record without remote lookups
    Extract {
        /// JSON file holding a record or its documents
        file: PathBuf,
        /// Read documents from the record's nested `kyc` field
        #[arg(short, long)]
        kyc_field: bool,
    },
    /// Extract and resolve document references against the storage bucket
    Normalize {
        /// JSON file holding a record or its documents
        file: PathBuf,
        /// Project path holding the configuration
        #[arg(short, long)]
        path: Option<String>,
        /// Read documents from the record's nested `kyc` field
        #[arg(short, long)]
        kyc_field: bool,
    },
    /// Merge two normalized document sets; the first one wins per slot
    Merge {
        /// Primary normalized set
        primary: PathBuf,
        /// Secondary normalized set
        secondary: PathBuf,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            path,
            bucket,
            endpoint,
        } => {
            let project_path = resolve_path(path);
            let mut config = load_config(&project_path)?;
            config.storage_bucket = bucket;
            if let Some(endpoint) = endpoint {
                config.storage_endpoint = endpoint;
            }
            config.validate()?;
            save_config(&project_path, &config)?;
            println!(
                "Wrote configuration to {}",
                get_config_path(&project_path).display()
            );
        }
        Commands::Extract { file, kyc_field } => {
            let raw = read_raw_documents(&file, kyc_field)?;
            print_set(&extract_document_set(&raw))?;
        }
        Commands::Normalize {
            file,
            path,
            kyc_field,
        } => {
            let project_path = resolve_path(path);
            let config = load_config(&project_path)?;
            let raw = read_raw_documents(&file, kyc_field)?;
            let normalized = normalize(&config, &raw)?;
            info!(
                provided = normalized.provided_count(),
                "resolved document set from {}",
                file.display()
            );
            print_set(&normalized)?;
        }
        Commands::Merge { primary, secondary } => {
            let primary: NormalizedDocumentSet = serde_json::from_value(read_json(&primary)?)?;
            let secondary: NormalizedDocumentSet =
                serde_json::from_value(read_json(&secondary)?)?;
            print_set(&merge_document_sets(&primary, &secondary))?;
        }
    }
    Ok(())
}

/// Runs resolution on a single-threaded runtime.
fn normalize(config: &DocRefConfig, raw: &RawDocumentSet) -> Result<NormalizedDocumentSet> {
    let resolver = ReferenceResolver::new(FirebaseStorageResolver::from_config(config)?);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(resolver.normalize_document_set(raw)))
}

fn read_json(file: &Path) -> Result<Value> {
    let contents = fs::read_to_string(file).map_err(|e| DocRefError::Input {
        message: e.to_string(),
        path: file.display().to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| DocRefError::Input {
        message: format!("invalid JSON: {}", e),
        path: file.display().to_string(),
    })
}

/// Reads a record and picks out its document fields.
///
/// A top-level `documents` (or, with `kyc_field`, `kyc`) object is used when
/// present; otherwise the whole file is taken as that object.
fn read_raw_documents(file: &Path, kyc_field: bool) -> Result<RawDocumentSet> {
    let record = read_json(file)?;
    let key = if kyc_field { "kyc" } else { "documents" };
    let section = record.get(key).filter(|v| v.is_object()).unwrap_or(&record);
    Ok(if kyc_field {
        gather_kyc_documents(section)
    } else {
        RawDocumentSet::from_value(section)
    })
}

fn print_set(set: &NormalizedDocumentSet) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(set)?);
    Ok(())
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
