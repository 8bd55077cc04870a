use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use shopgate::application::{AuthorizationHeader, SessionContext};
use shopgate::domain::ports::TokenStoragePort;
use shopgate::infrastructure::config::{Password, StorageConfig};
use shopgate::infrastructure::{
    ApiClient, AppConfig, CliArgs, Command, ConfigStore, FileTokenStorage, StorageBackend,
};
use shopgate::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match ConfigStore::discover() {
        Ok(store) => store.load(args.config.as_deref())?,
        Err(e) => {
            eprintln!("warning: {e}, using default configuration");
            AppConfig::default()
        }
    };
    config.merge_with_args(args);
    Ok(config)
}

fn file_storage(config: &StorageConfig) -> Result<Arc<dyn TokenStoragePort>> {
    let path = config
        .effective_path()
        .ok_or_else(|| eyre!("cannot determine a session file location; set storage.path"))?;
    Ok(Arc::new(FileTokenStorage::new(path)))
}

fn create_storage(config: &StorageConfig) -> Result<Arc<dyn TokenStoragePort>> {
    match config.backend {
        #[cfg(feature = "keyring")]
        StorageBackend::Keyring => Ok(Arc::new(shopgate::infrastructure::KeyringTokenStorage::new())),
        #[cfg(not(feature = "keyring"))]
        StorageBackend::Keyring => {
            warn!("Built without keyring support, falling back to file storage");
            file_storage(config)
        }
        StorageBackend::File => file_storage(config),
    }
}

/// Reads a line from a non-interactive stdin, dropping the line ending.
fn read_piped_password() -> Result<Zeroizing<String>> {
    let mut password = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut password)
        .wrap_err("failed to read password")?;
    let len = password.trim_end_matches(['\r', '\n']).len();
    password.truncate(len);
    Ok(password)
}

/// Reads key presses in raw mode so nothing is echoed.
fn read_hidden_password() -> Result<Zeroizing<String>> {
    let mut password = Zeroizing::new(String::with_capacity(64));

    terminal::enable_raw_mode().wrap_err("failed to disable terminal echo")?;
    let outcome = loop {
        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(e) => break Err(eyre!(e).wrap_err("failed to read password")),
        };
        match key.code {
            KeyCode::Enter => break Ok(()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                break Err(eyre!("password entry cancelled"));
            }
            KeyCode::Backspace => {
                password.pop();
            }
            KeyCode::Char(c) => password.push(c),
            _ => {}
        }
    };
    terminal::disable_raw_mode()?;
    eprintln!();

    outcome.map(|()| password)
}

fn prompt_password(command: Command) -> Result<Command> {
    match command {
        Command::Login {
            email,
            password: None,
        } => {
            let mut stderr = io::stderr();
            write!(stderr, "Password for {email}: ")?;
            stderr.flush()?;

            let password = if io::stdin().is_terminal() {
                read_hidden_password()?
            } else {
                read_piped_password()?
            };
            if password.is_empty() {
                warn!("Empty password entered");
            }

            Ok(Command::Login {
                email,
                password: Some(Password::new(password)),
            })
        }
        other => Ok(other),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = shopgate::VERSION, "Starting Shopgate");

    let authorization = AuthorizationHeader::new();
    let api = Arc::new(ApiClient::new(&config.api, authorization.clone())?);
    let storage = create_storage(&config.storage)?;

    let context = SessionContext::start(api.clone(), storage, authorization, config.routes).await;
    let app = App::new(context, api);

    let command = prompt_password(args.command)?;
    let mut stdout = io::stdout().lock();
    app.run(command, &mut stdout).await
}
