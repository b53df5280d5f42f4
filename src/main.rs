//! Swagger From Source - Command-line tool for generating embeddable Swagger documentation.
//!
//! This binary reads a project's namespace router, follows the controller packages it imports,
//! parses the `@` annotations in the handlers' doc comments and writes `docs/docs.rs`: a module
//! embedding the Swagger 1.2 resource listing and API declarations, registered at startup by
//! its `init()` function.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate the artifact, resolving external controller crates under `~/src`:
//! ```bash
//! swagger-from-source ./my-api-project -s ~/src
//! ```
//!
//! Also dump the assembled schema as YAML:
//! ```bash
//! swagger-from-source ./my-api-project --print yaml
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! swagger-from-source ./my-api-project -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_source::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag, then validate after the logger is up
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger From Source starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
