use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableBracketedPaste, DisableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use smartdoc::api::{BackendClient, Credentials, DocumentBackend};
use smartdoc::auth::{generate_nonce, IdentityProvider};
use smartdoc::config::AppConfig;
use smartdoc::core::logging::{self, LogMode};
use smartdoc::tui::{AppState, Services};

#[derive(Debug, Parser)]
#[command(name = "smartdoc", version, about = "Smart Document Analyzer terminal client")]
struct Cli {
    /// Config file (defaults to ~/.config/smartdoc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override backend.base_url
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Sign in with this ID token on startup
    #[arg(long, env = "SMARTDOC_ID_TOKEN", hide_env_values = true)]
    id_token: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the identity provider sign-in URL
    SignInUrl,
    /// Create a password account on the backend
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with a password account and list its documents
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = AppConfig::load_from(cli.config.as_deref());
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }

    let mode = if cli.command.is_some() {
        LogMode::Console
    } else {
        LogMode::Tui
    };
    let _log_guard = logging::init(&config.log_dir(), mode);
    log::info!("{} v{} starting", smartdoc::NAME, smartdoc::VERSION);
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    match config_error {
        Some(e) => log::warn!(
            "Failed to load config from {}: {e}; using defaults",
            config_path.display()
        ),
        None => log::info!("Loaded config (file: {})", config_path.display()),
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    match cli.command {
        Some(command) => runtime.block_on(run_command(command, &config)),
        None => runtime.block_on(run_tui(&config, cli.id_token)),
    }
}

async fn run_command(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::SignInUrl => {
            let provider = IdentityProvider::from_config(&config.auth)?;
            println!("{}", provider.sign_in_url(&generate_nonce()));
        }
        Command::Register { username, password } => {
            let client = backend_client(config)?;
            let response = client
                .register(&Credentials { username, password })
                .await
                .context("registration failed")?;
            println!("{}", response.message);
        }
        Command::Login { username, password } => {
            let client = backend_client(config)?;
            let response = client
                .login(&Credentials { username, password })
                .await
                .context("login failed")?;
            println!("{}", response.message);
            for document in &response.documents {
                println!("  {}", document.filename);
            }
            if let Err(e) = client.logout().await {
                log::warn!("Logout after listing failed: {e}");
            }
        }
    }
    Ok(())
}

fn backend_client(config: &AppConfig) -> anyhow::Result<BackendClient> {
    BackendClient::new(&config.backend.base_url, config.backend.timeout())
        .with_context(|| format!("invalid backend URL {}", config.backend.base_url))
}

async fn run_tui(config: &AppConfig, id_token: Option<String>) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(config, event_tx)
        .with_context(|| format!("invalid backend URL {}", config.backend.base_url))?;
    let mut app = AppState::new(event_rx, services);

    if let Some(token) = id_token {
        if app.sign_in_with(&token).is_none() {
            bail!("the supplied ID token was rejected");
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if config.tui.mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms.max(1));
    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    if config.tui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result.context("terminal I/O failed")?;
    log::info!("{} exiting", smartdoc::NAME);
    Ok(())
}
