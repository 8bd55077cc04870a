use super::app_config::{LogLevel, StorageBackend};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use zeroize::Zeroizing;

#[derive(Debug, Parser)]
#[command(
    name = "shopgate",
    version,
    about = "Session-aware terminal client for the storefront admin API",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// API base URL.
    #[arg(long, value_name = "URL", env = "SHOPGATE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Token storage backend.
    #[arg(long, value_enum, global = true)]
    pub storage: Option<StorageBackend>,

    #[command(subcommand)]
    pub command: Command,
}

/// Password argument, wiped on drop and redacted in `Debug`.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wraps an already-wiped buffer.
    #[must_use]
    pub const fn new(secret: Zeroizing<String>) -> Self {
        Self(secret)
    }

    #[must_use]
    pub fn into_secret(self) -> Zeroizing<String> {
        self.0
    }
}

impl FromStr for Password {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Zeroizing::new(s.to_string())))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session.
    Login {
        /// Account email.
        #[arg(short, long)]
        email: String,

        /// Account password. Prompted on stdin when omitted.
        #[arg(long, env = "SHOPGATE_PASSWORD", hide_env_values = true)]
        password: Option<Password>,
    },
    /// Clear the session.
    Logout,
    /// Show the current session.
    Status,
    /// Check whether a path may be visited.
    Navigate {
        /// Target path.
        path: String,

        /// Path navigated from.
        #[arg(long)]
        from: Option<String>,
    },
    /// List routes and their requirements.
    Routes,
    /// Perform an authorized GET against the API.
    Get {
        /// API path, e.g. `/api/products`.
        path: String,
    },
}
