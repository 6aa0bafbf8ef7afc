use crate::adapter::build_swagger;
use crate::sample_service::{self, DOCS_PATH};
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::store::DocumentStore;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Swagger document generator - documents the bundled sample service by dry-running its handlers,
/// or serves it together with its documentation endpoints
#[derive(Parser, Debug)]
#[command(name = "openapi-from-handlers")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Network address the documented service listens on
    #[arg(short = 'a', long = "address", default_value = ":1323")]
    pub address: String,

    /// Base path of the API version to document
    #[arg(short = 'b', long = "base-path", default_value = "/api/v1")]
    pub base_path: String,

    /// Title of the generated document
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Serve the sample service and its documentation instead of printing a document
    #[arg(short = 's', long = "serve")]
    pub serve: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.address.is_empty() {
        anyhow::bail!("Address must not be empty");
    }

    if !args.base_path.starts_with('/') {
        anyhow::bail!("Base path must start with '/': {}", args.base_path);
    }

    if args.serve {
        info!("Serving on {}", listen_address(&args.address));
        return Ok(args);
    }

    info!("Address: {}", args.address);
    info!("Base path: {}", args.base_path);
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Socket address for a service address; `:1323` listens on every interface
pub fn listen_address(address: &str) -> String {
    if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}

/// Serve both API versions until the process is stopped
pub fn serve(args: &CliArgs) -> Result<()> {
    let (router, store) = sample_service::build_service(&args.address)
        .with_context(|| format!("Failed to build service for {}", args.address))?;
    for key in store.keys() {
        info!(
            "Documentation for {} at {}{}index.html",
            key,
            key.base_path.trim_end_matches('/'),
            DOCS_PATH
        );
    }

    let bind = listen_address(&args.address);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(&bind)
            .await
            .with_context(|| format!("Failed to bind {}", bind))?;
        info!("Listening on {}", bind);
        axum::serve(listener, router).await.context("Server stopped")
    })
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    if args.serve {
        return serve(&args);
    }

    info!("Starting document generation...");

    // Step 1: Build the service and dry-run its handlers
    let router = sample_service::routes();
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| format!("Swagger Example API {}", args.base_path));
    let config = sample_service::api_config(&args.base_path, &title);

    let mut store = DocumentStore::new();
    let key = build_swagger(&router, &args.address, config, &mut store)
        .with_context(|| format!("Failed to build document for {}{}", args.address, args.base_path))?;
    let document = store
        .get(&key)
        .with_context(|| format!("Document {} was not registered", key))?;
    info!("Document built successfully");

    // Step 2: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(document)?,
        OutputFormat::Json => serialize_json(document)?,
    };

    // Step 3: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Paths documented: {}", document.paths.len());
    info!("  - Definitions: {}", document.definitions.len());

    Ok(())
}
