//! Process settings.
//!
//! Values are layered: built-in defaults, then `config/expenses.toml` (or the
//! file passed with `--config`), then `EXPENSES__*` environment variables,
//! then command-line flags.

use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/expenses.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3001,
            allowed_origins: server::ServerOptions::default().allowed_origins,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
    /// Connection attempts made before giving up.
    pub max_retries: u32,
    /// Seconds to wait between attempts.
    pub retry_delay_secs: u64,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite:./expenses.db?mode=rwc".to_string(),
            max_retries: 10,
            retry_delay_secs: 3,
        }
    }
}

impl Database {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

#[derive(Debug, Parser)]
#[command(name = "expense_tracker", about = "Personal expense tracker API")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
    /// Override bind address.
    #[arg(long)]
    bind: Option<String>,
    /// Override listening port.
    #[arg(long, env = "PORT")]
    port: Option<u16>,
    /// Override database URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings = Self::from_sources(path)?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }
        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(url) = args.database_url {
            settings.database.url = url;
        }

        Ok(settings)
    }

    fn from_sources(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("EXPENSES")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
