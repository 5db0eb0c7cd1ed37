use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::analysis::{AnalysisConfig, PositiveClass, RewriteThresholds};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub analysis: AnalysisConfig,
    pub collaborators: CollaboratorEndpoints,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = environment == AppEnvironment::Development;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            analysis: load_analysis()?,
            collaborators: load_endpoints()?,
        })
    }
}

fn load_analysis() -> Result<AnalysisConfig, ConfigError> {
    let defaults = RewriteThresholds::default();
    let thresholds = RewriteThresholds {
        toxicity: threshold_var("TONE_TOXICITY_THRESHOLD", defaults.toxicity)?,
        empathy: threshold_var("TONE_EMPATHY_THRESHOLD", defaults.empathy)?,
        politeness: threshold_var("TONE_POLITENESS_THRESHOLD", defaults.politeness)?,
        prosocial: threshold_var("TONE_PROSOCIAL_THRESHOLD", defaults.prosocial)?,
    };

    let mut analysis = AnalysisConfig {
        thresholds,
        ..AnalysisConfig::default()
    };
    if let Some(label) = non_empty_var("TONE_EMPATHY_LABEL") {
        analysis.empathy_class = PositiveClass::new(label, &["empathy"]);
    }
    if let Some(label) = non_empty_var("TONE_POLITENESS_LABEL") {
        analysis.politeness_class = PositiveClass::new(label, &["politeness"]);
    }
    Ok(analysis)
}

fn load_endpoints() -> Result<CollaboratorEndpoints, ConfigError> {
    let timeout = match non_empty_var("TONE_COLLABORATOR_TIMEOUT_SECS") {
        Some(raw) => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout)?;
            Duration::from_secs(secs)
        }
        None => CollaboratorEndpoints::DEFAULT_TIMEOUT,
    };

    Ok(CollaboratorEndpoints {
        toxicity: non_empty_var("TONE_TOXICITY_URL"),
        empathy: non_empty_var("TONE_EMPATHY_URL"),
        politeness: non_empty_var("TONE_POLITENESS_URL"),
        emotion: non_empty_var("TONE_EMOTION_URL"),
        sentiment: non_empty_var("TONE_SENTIMENT_URL"),
        lexicon: non_empty_var("TONE_LEXICON_URL"),
        rewriter: non_empty_var("TONE_REWRITER_URL"),
        timeout,
    })
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn threshold_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(default);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidThreshold { variable: name })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold { variable: name });
    }
    Ok(value)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Model-serving endpoints backing each collaborator. Unset endpoints surface as
/// "not configured" collaborator errors when the pipeline first needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorEndpoints {
    pub toxicity: Option<String>,
    pub empathy: Option<String>,
    pub politeness: Option<String>,
    pub emotion: Option<String>,
    pub sentiment: Option<String>,
    pub lexicon: Option<String>,
    pub rewriter: Option<String>,
    pub timeout: Duration,
}

impl CollaboratorEndpoints {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for CollaboratorEndpoints {
    fn default() -> Self {
        Self {
            toxicity: None,
            empathy: None,
            politeness: None,
            emotion: None,
            sentiment: None,
            lexicon: None,
            rewriter: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { variable: &'static str },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { variable } => {
                write!(f, "{variable} must be a number between 0 and 1")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "TONE_COLLABORATOR_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold { .. }
            | ConfigError::InvalidTimeout => None,
        }
    }
}
