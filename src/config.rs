//! Configuration management for session-dashboard.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ServerConfig;
use crate::cli::Args;
use crate::session::{Session, SessionStore, SessionToken, SessionUser, DEFAULT_COOKIE_NAME};
use crate::view::{MissingUser, RenderOptions};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Session lookup configuration.
    pub session: SessionSection,
    /// Page presentation.
    pub dashboard: DashboardSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable graceful shutdown.
    pub graceful_shutdown: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown: true,
        }
    }
}

/// Session lookup section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Cookie carrying the session token.
    pub cookie_name: String,
    /// Session lifetime in seconds. Sessions never expire when unset.
    pub ttl_secs: Option<u64>,
    /// Sessions preloaded into the store at startup.
    pub seed: Vec<SeedSession>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            ttl_secs: None,
            seed: Vec::new(),
        }
    }
}

/// A preloaded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSession {
    /// Token the session is reachable under.
    pub token: String,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub expires: Option<String>,
}

/// Dashboard presentation section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    /// Document title.
    pub title: String,
    /// What to render when nobody is signed in.
    pub missing_user: MissingUser,
    /// Text shown for absent user fields.
    pub placeholder: String,
}

impl Default for DashboardSection {
    fn default() -> Self {
        let defaults = RenderOptions::default();
        Self {
            title: defaults.title,
            missing_user: defaults.missing_user,
            placeholder: defaults.placeholder,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a full filter directive.
    pub level: String,
    /// Log every resolved session, redacted, at debug level.
    pub trace_sessions: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            trace_sessions: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SESSION_DASHBOARD_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("SESSION_DASHBOARD_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(
                    value = %port,
                    "ignoring SESSION_DASHBOARD_PORT, not a valid port"
                ),
            }
        }

        if let Ok(level) = std::env::var("SESSION_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }

        if let Ok(flag) = std::env::var("SESSION_DASHBOARD_TRACE_SESSIONS") {
            self.logging.trace_sessions = matches!(flag.as_str(), "1" | "true" | "yes");
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }

        if args.trace_sessions {
            self.logging.trace_sessions = true;
        }

        if let Some(mode) = args.missing_user {
            self.dashboard.missing_user = mode;
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to ServerConfig for the HTTP server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        let mut server_config = ServerConfig::new(host.to_string(), self.server.port);
        if !self.server.graceful_shutdown {
            server_config = server_config.without_graceful_shutdown();
        }

        Ok(server_config)
    }

    /// Presentation options for the dashboard renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .with_title(&self.dashboard.title)
            .with_missing_user(self.dashboard.missing_user)
            .with_placeholder(&self.dashboard.placeholder)
    }

    /// Build a session store holding the seeded sessions.
    pub fn build_store(&self) -> Result<SessionStore, ConfigError> {
        let store = match self.session.ttl_secs {
            Some(secs) => SessionStore::with_ttl(Duration::from_secs(secs)),
            None => SessionStore::new(),
        };

        for seed in &self.session.seed {
            let token = SessionToken::new(seed.token.as_str())
                .ok_or_else(|| ConfigError::InvalidToken(seed.token.clone()))?;
            let session = Session {
                user: seed.user.clone(),
                expires: seed.expires.clone(),
            };
            let replaced = store
                .insert_with_token(token, session)
                .map_err(ConfigError::Store)?;
            if replaced {
                return Err(ConfigError::DuplicateToken(seed.token.clone()));
            }
        }

        Ok(store)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid host address.
    InvalidHost(String),
    /// Seeded session token is not usable.
    InvalidToken(String),
    /// Two seeded sessions share a token.
    DuplicateToken(String),
    /// The session store rejected a seeded session.
    Store(crate::error::DashboardError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: {}", host),
            Self::InvalidToken(token) => write!(f, "invalid seed session token: '{}'", token),
            Self::DuplicateToken(token) => {
                write!(f, "seed session token used more than once: '{}'", token)
            }
            Self::Store(e) => write!(f, "failed to seed session store: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
