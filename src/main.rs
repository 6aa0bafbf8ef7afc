//! openapi-from-handlers - Command-line tool printing the Swagger document of the sample service.
//!
//! The document is produced the same way a service would produce it at
//! startup: every route handler is invoked once in documenting mode and
//! describes itself.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-handlers [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Print the v1 document as JSON:
//! ```bash
//! openapi-from-handlers
//! ```
//!
//! Write the v2 document as YAML:
//! ```bash
//! openapi-from-handlers -b /api/v2 -f yaml -o swagger.yaml
//! ```
//!
//! Serve the sample service with Swagger UI at /api/v1/swagger/:
//! ```bash
//! openapi-from-handlers --serve -a 127.0.0.1:1323
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-from-handlers -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use openapi_from_handlers::cli::{self, CliArgs};

fn main() -> Result<()> {
    let parsed = CliArgs::parse();

    // --verbose sets the default level; RUST_LOG module directives still apply
    env_logger::Builder::from_default_env()
        .filter_level(if parsed.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    info!("openapi-from-handlers {} starting", env!("CARGO_PKG_VERSION"));

    let args = cli::parse_args_from_parsed(parsed)?;
    let output = args.output_path.clone();
    let serving = args.serve;
    cli::run(args)?;
    if serving {
        return Ok(());
    }

    match output {
        Some(path) => info!("Document written to {}", path.display()),
        None => info!("Document generation completed"),
    }
    Ok(())
}
