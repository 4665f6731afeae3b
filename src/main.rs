//! Daybook API Server
//!
//! Run with: cargo run --bin daybook -- serve
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or the default locations
//! searched by [`Config::load_default`]) with `DAYBOOK_*` environment
//! overrides on top. `RUST_LOG` takes precedence over `logging.level`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use daybook::api::{serve, AppState};
use daybook::auth::StaticTokenProvider;
use daybook::config::{generate_default_config, Config, LoggingConfig};
use daybook::diary::DiaryService;
use daybook::store::SqliteDiaryStore;
use daybook::weather::{OpenMeteoClient, WeatherConfig, WeatherProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal journal and mood tracking server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Config file (default: search standard locations)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { config: None }) {
        Commands::Serve { config } => {
            let config = match config {
                Some(path) => Config::load_with_env(&path)?,
                None => Config::load_default(),
            };
            init_tracing(&config.logging);
            run_server(config).await
        }
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write config to {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("daybook={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Daybook API server v{}", env!("CARGO_PKG_VERSION"));

    let database_path = expand_home(&config.storage.database_path);
    tracing::info!("Database: {:?}", database_path);

    let store = Arc::new(
        SqliteDiaryStore::open(&database_path)
            .with_context(|| format!("Failed to open diary store at {:?}", database_path))?,
    );

    let identity = Arc::new(StaticTokenProvider::from_config(&config.auth));
    if identity.is_empty() {
        tracing::warn!("No API tokens configured; every diary request will be rejected");
    } else {
        tracing::info!("{} API token(s) configured", identity.len());
    }

    let weather: Option<Arc<dyn WeatherProvider>> = if config.weather.enabled {
        let client = OpenMeteoClient::new(WeatherConfig {
            base_url: config.weather.base_url.clone(),
            request_timeout_ms: config.weather.timeout_ms,
        })?;
        tracing::info!("Weather lookup enabled: {}", config.weather.base_url);
        Some(Arc::new(client))
    } else {
        tracing::info!("Weather lookup disabled");
        None
    };

    let state = match weather {
        Some(weather) => AppState::new(
            DiaryService::with_weather(store, Arc::clone(&weather)),
            identity,
            config.api.clone(),
        )
        .with_weather(weather),
        None => AppState::new(DiaryService::new(store), identity, config.api.clone()),
    };

    serve(state).await?;

    tracing::info!("Daybook API server stopped");
    Ok(())
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(path).to_path_buf(),
    }
}
