use crate::config::ServerConfig;
use crate::emitter::{serialize_json, serialize_yaml};
use crate::generator::{DocsGenerator, DEFAULT_FRAMEWORK_ROOT, DEFAULT_ROUTER_FILE};
use crate::resolver::{SearchPathResolver, SEARCH_PATH_ENV};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Swagger From Source - Generate embeddable Swagger docs from namespace routers and handler doc comments
#[derive(Parser, Debug)]
#[command(name = "swagger-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Router file registering the namespaces, relative to the project
    #[arg(long = "router", value_name = "FILE", default_value = DEFAULT_ROUTER_FILE)]
    pub router: PathBuf,

    /// Source root to look up imported packages in (repeatable)
    #[arg(
        short = 's',
        long = "search-path",
        value_name = "DIR",
        env = SEARCH_PATH_ENV,
        value_delimiter = if cfg!(windows) { ';' } else { ':' }
    )]
    pub search_paths: Vec<PathBuf>,

    /// Framework crate whose packages are never scanned
    #[arg(long = "framework-root", value_name = "NAME", default_value = DEFAULT_FRAMEWORK_ROOT)]
    pub framework_root: String,

    /// Host used in the fallback base URL (overrides conf/app.conf)
    #[arg(long = "http-addr", value_name = "ADDR", env = "HTTP_ADDR")]
    pub http_addr: Option<String>,

    /// Port used in the fallback base URL (overrides conf/app.conf)
    #[arg(long = "http-port", value_name = "PORT", env = "HTTP_PORT")]
    pub http_port: Option<u16>,

    /// Also print the assembled schema to stdout
    #[arg(short = 'p', long = "print", value_enum, value_name = "FORMAT")]
    pub print: Option<OutputFormat>,

    /// Warn about annotated handlers and namespace options that are skipped
    #[arg(long = "strict")]
    pub strict: bool,

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

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    if args.framework_root.is_empty() {
        anyhow::bail!("Framework root must not be empty");
    }

    info!("Project path: {}", args.project_path.display());
    info!("Router: {}", args.router.display());
    if args.search_paths.is_empty() {
        info!("Search path: (none, only crate-local packages resolve)");
    } else {
        for path in &args.search_paths {
            info!("Search path: {}", path.display());
        }
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting Swagger document generation...");

    let config = ServerConfig::load(&args.project_path)?
        .with_overrides(args.http_addr.clone(), args.http_port);
    debug!("Server config: {:?}", config);

    let resolver = SearchPathResolver::new(args.search_paths.clone())
        .with_crate_src(args.project_path.join("src"));

    let generator = DocsGenerator::new(args.project_path.clone(), Box::new(resolver))
        .with_router_file(args.router.clone())
        .with_framework_root(args.framework_root.clone())
        .with_config(config)
        .with_strict(args.strict);

    let (docs, artifact) = generator.generate()?;

    if let Some(format) = args.print {
        let content = match format {
            OutputFormat::Yaml => serialize_yaml(&docs.schema)?,
            OutputFormat::Json => serialize_json(&docs.schema)?,
        };
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Namespaces: {}", docs.namespaces);
    info!("  - Groups: {}", docs.schema.declarations.len());
    info!("  - Handlers: {}", docs.handler_count());
    info!("  - Artifact: {}", artifact.display());

    Ok(())
}
