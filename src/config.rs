use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `SMARTDOC_BACKEND__BASE_URL`.
pub const ENV_PREFIX: &str = "SMARTDOC_";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub tui: TuiConfig,
    pub data: DataConfig,
}

/// Where the analyzer backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin of the REST API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Identity provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// OAuth client id. Takes precedence over `credentials_file`.
    pub client_id: Option<String>,
    /// Google console `credentials.json` holding `web.client_id`.
    pub credentials_file: Option<PathBuf>,
    /// Redirect URI registered for the client.
    pub redirect_uri: String,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory (logs live here).
    pub data_dir: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            credentials_file: None,
            redirect_uri: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl AppConfig {
    /// Layered sources: defaults, then the TOML file, then `SMARTDOC_*` env vars.
    pub fn figment(config_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration, failing on unparseable sources.
    pub fn try_load_from(config_path: &Path) -> Result<Self, figment::Error> {
        Self::figment(config_path).extract()
    }

    /// Load configuration from `path` (or `~/.config/smartdoc/config.toml`).
    ///
    /// Unparseable sources yield `Default` together with the error, so the
    /// caller can report it once logging is up.
    pub fn load_from(path: Option<&Path>) -> (Self, Option<figment::Error>) {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);
        match Self::try_load_from(&config_path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("smartdoc"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("smartdoc").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
