mod banner;
mod bootstrap;
mod cli;
mod dotenv;
mod seed;

use std::process::ExitCode;

use colloquy_config::ColloquyConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "colloquy=info";

fn init_logging(directive: &str) {
    let directive: Directive = directive.parse().unwrap_or_else(|_| {
        DEFAULT_LOG_DIRECTIVE
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into())
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

fn load_config(args: &cli::Args) -> colloquy_common::Result<ColloquyConfig> {
    Ok(colloquy_config::load_config(args.config.as_deref())?)
}

fn main() -> ExitCode {
    // Load .env file before anything else
    dotenv::load_dotenv();

    let args = cli::parse();

    // The config may carry the log directive, so it is read first.
    let config = load_config(&args);
    let directive = match (&args.log_level, &config) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.clone(),
        (None, Err(_)) => DEFAULT_LOG_DIRECTIVE.to_string(),
    };
    init_logging(&directive);

    tracing::info!("Colloquy v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout();
    let result = runtime.block_on(bootstrap::run(
        &args,
        &config,
        |name| std::env::var(name).ok(),
        bootstrap::connect,
        &mut stdout,
    ));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
