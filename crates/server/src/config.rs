//! Server configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional toml file (`seekserve.toml` unless another path is given)
//! 3. `SEEKSERVE_*` environment variables, with `__` between nested keys,
//!    e.g. `SEEKSERVE_SERVER__PORT=9090`

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::Level;

use crate::error::ServerError;

/// File loaded when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "seekserve.toml";

const ENV_PREFIX: &str = "SEEKSERVE";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub playlist: PlaylistConfig,
    pub suspend: SuspendConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_dir: PathBuf,
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistConfig {
    pub source_url: String,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuspendConfig {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Loads the configuration, reading `path` (or [`DEFAULT_CONFIG_FILE`]) when it exists.
    pub fn load(path: Option<&str>) -> Result<Self, ServerError> {
        let file = path.unwrap_or(DEFAULT_CONFIG_FILE);
        let (program, args) = default_suspend_command();

        let settings = config::Config::builder()
            .set_default("app.name", env!("CARGO_PKG_NAME"))?
            .set_default("app.version", env!("CARGO_PKG_VERSION"))?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.base_dir", ".")?
            .set_default("server.read_timeout_secs", 5)?
            .set_default("playlist.source_url", "")?
            .set_default("playlist.groups", vec!["NFL", "MLB"])?
            .set_default("suspend.program", program)?
            .set_default("suspend.args", args)?
            .set_default("logging.level", "info")?
            .add_source(config::File::with_name(file).required(path.is_some()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("playlist.groups")
                    .with_list_parse_key("suspend.args")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl LoggingConfig {
    /// The configured level, falling back to `INFO` for unknown names.
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

fn default_suspend_command() -> (&'static str, Vec<&'static str>) {
    if cfg!(windows) {
        ("rundll32.exe", vec!["powrprof.dll,SetSuspendState", "0,1,0"])
    } else {
        ("systemctl", vec!["suspend"])
    }
}
