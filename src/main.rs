use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use research_notebook::config::{find_config_file, load_config, Config};
use research_notebook::llm::{matching_models, GeminiClient, TextGenerator};
use research_notebook::server::{self, AppState};
use research_notebook::sources::ArxivSource;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Research Notebook - note analysis, arXiv search and local persistence
#[derive(Parser, Debug)]
#[command(name = "research-notebook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Backend for the research notebook frontend", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long, short)]
        port: Option<u16>,

        /// JSON file holding the notebook state
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Check that the model provider is reachable, then exit
    Check,
}

fn init_tracing(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let level = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(
        |_| format!("research_notebook={level},tower_http={level}"),
    ));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Log the models matching the configured id. Never fatal.
async fn log_available_models(generator: &dyn TextGenerator) -> bool {
    tracing::info!("Checking available models");
    match matching_models(generator).await {
        Ok(models) if models.is_empty() => {
            tracing::warn!(model = generator.model(), "Configured model not listed by provider");
            false
        }
        Ok(models) => {
            for name in models {
                tracing::info!("Found model: {}", name);
            }
            true
        }
        Err(e) => {
            tracing::warn!("Model listing failed: {}", e);
            false
        }
    }
}

async fn run_server(config: Config, generator: Arc<dyn TextGenerator>) -> Result<()> {
    let source = ArxivSource::from_config(&config.arxiv).context("Failed to build arXiv client")?;
    let state = AppState::new(&config, generator, Arc::new(source));
    tracing::info!(data_file = %config.storage.data_file.display(), "Using data file");

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    server::serve(listener, state).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the key may come from the real environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli);

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        data_file: None,
    });

    if let Commands::Serve {
        host,
        port,
        data_file,
    } = &command
    {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
        if let Some(data_file) = data_file {
            config.storage.data_file = data_file.clone();
        }
    }

    let gemini = GeminiClient::from_config(&config.llm).context("Failed to build Gemini client")?;
    if !gemini.has_api_key() {
        tracing::warn!("GEMINI_API_KEY is not set; /ask and /ask_paper will return errors");
    }
    let generator: Arc<dyn TextGenerator> = Arc::new(gemini);

    let reachable = log_available_models(generator.as_ref()).await;

    match command {
        Commands::Check => {
            if !reachable {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Serve { .. } => run_server(config, generator).await,
    }
}
