//! Configuration handling for the application.
//!
//! Everything is read once from the process environment at startup and then
//! handed to the components that need it. Credentials are optional at the
//! process level: a missing key only disables the feature path that needs it,
//! and the calls on that path fail naturally.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::analyzer::PromptProfile;

/// Environment variable names. Kept public so tests and the binary can refer
/// to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_VIMEO_ACCESS_TOKEN: &str = "VIMEO_ACCESS_TOKEN";
pub const ENV_SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_ANALYSIS_PROFILE: &str = "ANALYSIS_PROFILE";
pub const ENV_ANALYSIS_TEMPERATURE: &str = "ANALYSIS_TEMPERATURE";
pub const ENV_MAX_INPUT_CHARS: &str = "MAX_INPUT_CHARS";
pub const ENV_FETCH_ARTICLE_URLS: &str = "FETCH_ARTICLE_URLS";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_YOUTUBE_API_BASE_URL: &str = "YOUTUBE_API_BASE_URL";
pub const ENV_VIMEO_API_BASE_URL: &str = "VIMEO_API_BASE_URL";
pub const ENV_SPOTIFY_ACCOUNTS_BASE_URL: &str = "SPOTIFY_ACCOUNTS_BASE_URL";
pub const ENV_SPOTIFY_API_BASE_URL: &str = "SPOTIFY_API_BASE_URL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_INPUT_CHARS: usize = 12_000;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com";
const DEFAULT_VIMEO_API_BASE_URL: &str = "https://api.vimeo.com";
const DEFAULT_SPOTIFY_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
const DEFAULT_SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Upstream API credentials. Every entry is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub vimeo_access_token: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

impl Credentials {
    pub fn spotify_configured(&self) -> bool {
        self.spotify_client_id.is_some() && self.spotify_client_secret.is_some()
    }
}

/// Base URLs of the upstream collaborators. Overridable so tests can point
/// them at a local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamUrls {
    pub openai: String,
    pub youtube: String,
    pub vimeo: String,
    pub spotify_accounts: String,
    pub spotify_api: String,
}

impl Default for UpstreamUrls {
    fn default() -> Self {
        Self {
            openai: DEFAULT_OPENAI_BASE_URL.to_string(),
            youtube: DEFAULT_YOUTUBE_API_BASE_URL.to_string(),
            vimeo: DEFAULT_VIMEO_API_BASE_URL.to_string(),
            spotify_accounts: DEFAULT_SPOTIFY_ACCOUNTS_BASE_URL.to_string(),
            spotify_api: DEFAULT_SPOTIFY_API_BASE_URL.to_string(),
        }
    }
}

/// Settings for the completion calls made by the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub model: String,
    pub profile: PromptProfile,
    pub temperature: Option<f32>,
    pub max_input_chars: usize,
    pub fetch_article_urls: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_OPENAI_MODEL.to_string(),
            profile: PromptProfile::default(),
            temperature: None,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            fetch_article_urls: true,
        }
    }
}

impl AnalysisSettings {
    /// Temperature actually sent upstream: the override if set, otherwise the
    /// profile's own value.
    pub fn effective_temperature(&self) -> f32 {
        self.temperature
            .unwrap_or_else(|| self.profile.default_temperature())
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    bind_addr: String,
    credentials: Credentials,
    upstream: UpstreamUrls,
    analysis: AnalysisSettings,
    log_format: LogFormat,
}

impl Default for Config {
    /// Development defaults, the same values `from_env` uses when nothing is
    /// set.
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            credentials: Credentials::default(),
            upstream: UpstreamUrls::default(),
            analysis: AnalysisSettings::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let credentials = Credentials {
            openai_api_key: optional_var(ENV_OPENAI_API_KEY),
            youtube_api_key: optional_var(ENV_YOUTUBE_API_KEY),
            vimeo_access_token: optional_var(ENV_VIMEO_ACCESS_TOKEN),
            spotify_client_id: optional_var(ENV_SPOTIFY_CLIENT_ID),
            spotify_client_secret: optional_var(ENV_SPOTIFY_CLIENT_SECRET),
        };

        let defaults = UpstreamUrls::default();
        let upstream = UpstreamUrls {
            openai: base_url_var(ENV_OPENAI_BASE_URL, defaults.openai),
            youtube: base_url_var(ENV_YOUTUBE_API_BASE_URL, defaults.youtube),
            vimeo: base_url_var(ENV_VIMEO_API_BASE_URL, defaults.vimeo),
            spotify_accounts: base_url_var(ENV_SPOTIFY_ACCOUNTS_BASE_URL, defaults.spotify_accounts),
            spotify_api: base_url_var(ENV_SPOTIFY_API_BASE_URL, defaults.spotify_api),
        };

        let temperature = parsed_var::<f32>(ENV_ANALYSIS_TEMPERATURE, "analysis_temperature")?;
        if let Some(t) = temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigError::InvalidValue {
                field: "analysis_temperature",
                reason: format!("{t} is outside 0.0..=2.0"),
            });
        }

        let max_input_chars = parsed_var::<usize>(ENV_MAX_INPUT_CHARS, "max_input_chars")?
            .unwrap_or(DEFAULT_MAX_INPUT_CHARS);
        if max_input_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_input_chars",
                reason: "must be greater than zero".to_string(),
            });
        }

        let analysis = AnalysisSettings {
            model: optional_var(ENV_OPENAI_MODEL).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            profile: parsed_var(ENV_ANALYSIS_PROFILE, "analysis_profile")?.unwrap_or_default(),
            temperature,
            max_input_chars,
            fetch_article_urls: parsed_var(ENV_FETCH_ARTICLE_URLS, "fetch_article_urls")?
                .unwrap_or(true),
        };

        let log_format = parsed_var(ENV_LOG_FORMAT, "log_format")?.unwrap_or_default();

        Ok(Self {
            bind_addr,
            credentials,
            upstream,
            analysis,
            log_format,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
    pub fn upstream(&self) -> &UpstreamUrls {
        &self.upstream
    }
    pub fn analysis(&self) -> &AnalysisSettings {
        &self.analysis
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// One `(name, configured)` pair per upstream credential, in the order
    /// they are reported at startup.
    pub fn credential_status(&self) -> [(&'static str, bool); 4] {
        let c = &self.credentials;
        [
            ("openai", c.openai_api_key.is_some()),
            ("youtube", c.youtube_api_key.is_some()),
            ("vimeo", c.vimeo_access_token.is_some()),
            ("spotify", c.spotify_configured()),
        ]
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn base_url_var(key: &str, default: String) -> String {
    optional_var(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or(default)
}

fn parsed_var<T>(key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional_var(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            }),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
