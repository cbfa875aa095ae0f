//! MEAI Counsel command line
//!
//! # Usage
//! ```bash
//! meai-counsel status
//! meai-counsel train [--samples 500]
//! meai-counsel analyze [--input request.json]   # reads stdin without --input
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use meai_counsel::adapters::{
    FallbackNarrativeGenerator, FileModelStore, InMemoryCoupleStore, JsonCoupleStore,
    StaticCatalogReader, YamlCatalogReader,
};
use meai_counsel::application::{
    AnalysisRequest, AnalyzeCoupleCommand, AnalyzeCoupleHandler, LoadModelsHandler, LoadOutcome,
    ModelRegistry, TrainModelsCommand, TrainModelsHandler,
};
use meai_counsel::config::{AppConfig, LoggingConfig};
use meai_counsel::domain::foundation::{DomainError, ErrorCode};
use meai_counsel::ports::{CatalogReader, CoupleStoreReader, ModelStore};

/// Relationship risk assessment from MEAI questionnaire data
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report whether a trained model set is available
    Status,
    /// Train and persist a new model set
    Train {
        /// Synthetic couples to generate (overrides configuration)
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Analyse one couple given as a JSON request
    Analyze {
        /// Request file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = config.validate() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    init_tracing(&config.logging);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = %err.code, details = ?err.details, "{}", err.message);
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<(), DomainError> {
    let catalog_reader: Arc<dyn CatalogReader> = match &config.catalog.path {
        Some(path) => Arc::new(YamlCatalogReader::new(path)),
        None => Arc::new(StaticCatalogReader::fallback()),
    };
    let couple_store: Arc<dyn CoupleStoreReader> = match &config.data.couples_path {
        Some(path) => Arc::new(JsonCoupleStore::new(path)),
        None => Arc::new(InMemoryCoupleStore::new()),
    };
    let model_store: Arc<dyn ModelStore> =
        Arc::new(FileModelStore::new(&config.storage.model_directory));
    let registry = Arc::new(ModelRegistry::new());

    match command {
        Command::Status => {
            let outcome = LoadModelsHandler::new(model_store, Arc::clone(&registry))
                .handle()
                .await?;
            if let LoadOutcome::NotTrained { missing } = &outcome {
                info!(?missing, "Run `meai-counsel train` to create a model set");
            }
            print_json(&registry.status().await)?;
        }
        Command::Train { samples } => {
            let handler = TrainModelsHandler::new(
                catalog_reader,
                couple_store,
                model_store,
                registry,
                config.training.options(),
            );
            let summary = handler
                .handle(TrainModelsCommand {
                    sample_count: samples,
                })
                .await?;
            print_json(&summary)?;
        }
        Command::Analyze { input } => {
            LoadModelsHandler::new(model_store, Arc::clone(&registry))
                .handle()
                .await?;
            let catalog = catalog_reader.load_catalog().await?;
            let request = parse_request(&read_input(input).await?)?;

            let handler = AnalyzeCoupleHandler::new(
                registry,
                catalog,
                FallbackNarrativeGenerator::new(),
                config.training.response_length_tolerance,
            );
            let report = handler.handle(AnalyzeCoupleCommand { request }).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn read_input(path: Option<PathBuf>) -> Result<String, DomainError> {
    let source = path
        .as_ref()
        .map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    let read = match path {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut buf = String::new();
            match tokio::io::stdin().read_to_string(&mut buf).await {
                Ok(_) => Ok(buf),
                Err(err) => Err(err),
            }
        }
    };
    read.map_err(|err| {
        DomainError::new(ErrorCode::InvalidFormat, format!("Cannot read request: {err}"))
            .with_detail("source", source)
    })
}

fn parse_request(raw: &str) -> Result<AnalysisRequest, DomainError> {
    serde_json::from_str(raw).map_err(|err| {
        DomainError::new(ErrorCode::SerializationError, format!("Invalid request: {err}"))
            .with_detail("line", err.line().to_string())
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), DomainError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| DomainError::new(ErrorCode::SerializationError, err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meai_counsel::application::{AnalysisError, TrainingError};

    #[test]
    fn malformed_request_is_a_serialization_error() {
        let err = parse_request("{\"questionnaire_responses\": [3, 3,").unwrap_err();

        assert_eq!(err.code, ErrorCode::SerializationError);
        assert_eq!(err.details.get("line").map(String::as_str), Some("1"));
        assert!(err.to_string().starts_with("[SERIALIZATION_ERROR]"));
    }

    #[test]
    fn empty_object_is_a_valid_request() {
        assert!(parse_request("{}").is_ok());
    }

    #[tokio::test]
    async fn missing_input_file_reports_its_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let err = read_input(Some(path.clone())).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.details.get("source"), Some(&path.display().to_string()));
    }

    #[test]
    fn handler_errors_keep_their_codes() {
        let analysis: DomainError = AnalysisError::ModelNotLoaded.into();
        let training: DomainError = TrainingError::EmptyTrainingSet.into();

        assert_eq!(analysis.code, ErrorCode::ModelNotLoaded);
        assert_eq!(training.code, ErrorCode::EmptyTrainingSet);
    }
}
