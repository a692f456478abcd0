use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use nexus::cmd;
use nexus::cmd::normalize::NormalizeArgs;
use nexus::cmd::plan::PlanArgs;
use nexus::cmd::ticket::TicketArgs;
use nexus::config::AppConfig;
use nexus::context::AppContext;
use nexus::error::AppResult;
use nexus::infra::groq::GroqClient;
use nexus::infra::jira::JiraClient;
use nexus::infra::ollama::OllamaClient;
use nexus::services::ProviderRegistry;

#[derive(Parser)]
#[command(name = "nexus", author, version, about = "Test plan generator for tracker tickets")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a ticket and print its canonical form.
    Ticket(TicketArgs),
    /// Generate a test plan for a ticket.
    Plan(PlanArgs),
    /// Flatten a rich-text document tree (JSON) into plain text.
    Normalize(NormalizeArgs),
    /// Show the effective configuration (secrets masked).
    Config,
    /// Verify connectivity to the tracker and generation providers.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(if error.is_client_error() { 2 } else { 1 });
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    let config = AppConfig::load()?;

    match command {
        Commands::Normalize(args) => cmd::normalize::run(args),
        Commands::Config => cmd::config::run(&config),
        Commands::Check => cmd::check::run(&config).await,
        Commands::Ticket(args) => {
            let context = build_context(config)?;
            cmd::ticket::run(&context, args).await
        }
        Commands::Plan(args) => {
            let context = build_context(config)?;
            cmd::plan::run(&context, args).await
        }
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    let tracker = config.tracker()?;

    if config.groq_api_key.is_none() {
        warn!("GROQ_API_KEY not configured; the hosted provider is unavailable");
    }

    let issue_tracker = Arc::new(JiraClient::new(tracker));
    let providers = ProviderRegistry::new()
        .with(Arc::new(GroqClient::new(
            config.groq_api_key.clone(),
            config.groq_base_url.clone(),
        )))
        .with(Arc::new(OllamaClient::new(config.ollama_base_url.clone())));

    Ok(AppContext::new(config, issue_tracker, providers))
}
