// Command-line entry point for pysift.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pysift::api::dto::{
    self, AnalysisResponse, FileResponse, FileValidationResponse, ValidationResponse,
};
use pysift::api::server;
use pysift::application::AnalyzeUsecase;
use pysift::infrastructure::concurrency;
use pysift::infrastructure::config::Config;
use pysift::infrastructure::source_loader::{SourceFile, SourceLoader};
use pysift::infrastructure::RustPythonParser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./pysift.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract functions, classes, loops, conditionals, assignments and imports
    Analyze {
        /// Input source file path (can specify multiple); stdin when none given
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Input source folder(s), scanned recursively for .py files
        #[arg(short = 'd', long)]
        folder: Vec<PathBuf>,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Check syntax only
    Validate {
        /// Input source file path (can specify multiple); stdin when none given
        #[arg(short, long)]
        input: Vec<PathBuf>,
    },
    /// Serve line-delimited JSON requests over TCP
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze { input, folder, compact } => {
            let pretty = config.output.pretty && !compact;
            analyze(&config, &input, &folder, pretty)
        }
        Command::Validate { input } => validate(&input),
        Command::Serve { port } => server::start_server(port.unwrap_or(config.server.port)),
    }
}

fn analyze(config: &Config, inputs: &[PathBuf], folders: &[PathBuf], pretty: bool) -> Result<()> {
    let usecase = AnalyzeUsecase::new(&RustPythonParser);
    let indent = config.output.indent;

    if inputs.is_empty() && folders.is_empty() {
        let source = SourceLoader::read_stdin()?;
        let response = AnalysisResponse::from(usecase.analyze(&source));
        println!("{}", dto::to_json(&response, pretty, indent)?);
        return Ok(());
    }

    let loader = SourceLoader::new(config.scan.exclude.clone());
    let mut paths: Vec<PathBuf> = inputs.to_vec();
    for folder in folders {
        paths.extend(loader.collect(folder)?);
    }
    let files = read_sources(&paths)?;

    let pool = concurrency::build_pool(config.scan.workers)?;
    let responses: Vec<FileResponse> = usecase
        .analyze_batch(&files, &pool)
        .into_iter()
        .map(FileResponse::from)
        .collect();
    tracing::info!(files = responses.len(), "batch analysis completed");
    println!("{}", dto::to_json(&responses, pretty, indent)?);
    Ok(())
}

fn validate(inputs: &[PathBuf]) -> Result<()> {
    let usecase = AnalyzeUsecase::new(&RustPythonParser);

    if inputs.is_empty() {
        let source = SourceLoader::read_stdin()?;
        let response = ValidationResponse::from(usecase.validate(&source));
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    for file in read_sources(inputs)? {
        let response = FileValidationResponse {
            result: ValidationResponse::from(usecase.validate(&file.source)),
            path: file.path,
        };
        println!(
            "{}",
            serde_json::to_string(&response).context("Failed to encode validation result")?
        );
    }
    Ok(())
}

/// Read every path, warning about (and skipping) the unreadable ones.
/// Fails when nothing at all could be read.
fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let files: Vec<SourceFile> = paths
        .iter()
        .filter_map(|path| match SourceLoader::read_file(path) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!("{:#}", e);
                None
            }
        })
        .collect();
    if files.is_empty() {
        anyhow::bail!("No readable Python sources among the given inputs");
    }
    Ok(files)
}
