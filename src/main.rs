use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use geminichat::cli::Commands;
use geminichat::connector::{API_KEY_ENV, ENDPOINT_ENV, KEY_PLACEMENT_ENV};
use geminichat::{AppConfig, Container, DomainError};

const LOG_FILE_ENV: &str = "GEMINICHAT_LOG";

#[derive(Parser)]
#[command(name = "geminichat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer with a local scripted client instead of calling the API
    #[arg(long, global = true)]
    mock: bool,

    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, global = true, env = ENDPOINT_ENV)]
    endpoint: Option<String>,

    /// Where to send the API key: `query` or `header`
    #[arg(long, global = true, env = KEY_PLACEMENT_ENV)]
    key_placement: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat);

    let interactive = matches!(command, Commands::Chat);
    init_tracing(cli.verbose, interactive)?;

    let config = AppConfig::resolve(cli.api_key, cli.endpoint, cli.key_placement, cli.mock)?;
    let container = Container::new(config)?;

    match command {
        Commands::Chat => {
            info!("Starting interactive chat (mock: {})", container.config().mock);
            geminichat::tui::run(container.chat_session()).await?;
        }

        Commands::Ask { question } => {
            let mut session = container.chat_session();
            if !session.ask(&question).await {
                return Err(DomainError::invalid_input("question is empty").into());
            }

            if let Some(error) = session.last_error() {
                eprintln!("{error}");
                std::process::exit(1);
            }

            if let Some(answer) = session.messages().last() {
                println!("{}", answer.text());
            }
        }
    }

    Ok(())
}

/// Interactive mode owns the terminal, so logs go to a file there and to
/// stderr otherwise.
fn init_tracing(verbose: bool, interactive: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if interactive {
        let path = log_file_path();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let subscriber = builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = builder.with_writer(std::io::stderr).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

fn log_file_path() -> PathBuf {
    std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("geminichat.log"))
}
