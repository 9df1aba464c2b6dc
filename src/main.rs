//! Manifest Fetcher CLI application
//!
//! Processes the configured streams one at a time and reports a summary.
//! Exits non-zero only when the configuration or streams file cannot be used.

use std::process;

use tracing::{debug, error, info};
use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

use manifest_fetcher::cli::{handle_check, handle_init_config, handle_run, Cli, Commands};
use manifest_fetcher::config::AppConfig;
use manifest_fetcher::constants::logging;
use manifest_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Fatal {} error: {}", e.category(), e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await;

    let level = match (cli.log_level(), &config) {
        (Some(level), _) => level.as_str().to_ascii_lowercase(),
        (None, Ok(config)) => config.logging.level.clone(),
        (None, Err(_)) => logging::DEFAULT_LOG_LEVEL.to_string(),
    };
    init_logging(&level, cli.global.very_verbose);

    info!("Manifest Fetcher v{} starting", env!("CARGO_PKG_VERSION"));
    match &config {
        Ok(AppConfig {
            source: Some(path), ..
        }) => info!("Loaded configuration from: {}", path.display()),
        Ok(_) => debug!("No config file found in standard locations, using defaults"),
        Err(e) => debug!("Configuration not loaded: {}", e),
    }

    match cli.command {
        Commands::InitConfig(args) => {
            info!("Executing init-config command");
            handle_init_config(args).await.map(|_| ())
        }
        Commands::Run(args) => {
            info!("Executing run command");
            handle_run(args, config?).await.map(|_| ())
        }
        Commands::Check(args) => {
            info!("Executing check command");
            handle_check(args, config?).await
        }
    }
}

/// Initialize logging for the given level
fn init_logging(level: &str, show_levels: bool) {
    let directive: Directive = format!("manifest_fetcher={}", level)
        .parse()
        .unwrap_or_else(|_| {
            format!("manifest_fetcher={}", logging::DEFAULT_LOG_LEVEL)
                .parse()
                .expect("Default log directive should parse")
        });

    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(show_levels)
        .init();
}
