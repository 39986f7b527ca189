use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::eligibility::ArtifactSource;

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
    pub model: ModelConfig,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");
        let log_format = LogFormat::parse(&var_or("APP_LOG_FORMAT", "compact"))?;

        let layout = ArtifactLayout::parse(&var_or("LOAN_ARTIFACT_LAYOUT", "pipeline"))?;
        let model = ModelConfig {
            layout,
            pipeline_path: PathBuf::from(var_or("LOAN_PIPELINE_PATH", DEFAULT_PIPELINE_PATH)),
            model_path: PathBuf::from(var_or("LOAN_MODEL_PATH", DEFAULT_MODEL_PATH)),
            preprocessor_path: PathBuf::from(var_or(
                "LOAN_PREPROCESSOR_PATH",
                DEFAULT_PREPROCESSOR_PATH,
            )),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            model,
        })
    }
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

pub const DEFAULT_PIPELINE_PATH: &str = "model_pipeline.json";
pub const DEFAULT_MODEL_PATH: &str = "model.json";
pub const DEFAULT_PREPROCESSOR_PATH: &str = "preprocessor.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactLayout {
    /// One file holding preprocessor and classifier together.
    Pipeline,
    /// Classifier and preprocessor in separate files.
    Split,
}

impl ArtifactLayout {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pipeline" => Ok(Self::Pipeline),
            "split" => Ok(Self::Split),
            other => Err(ConfigError::InvalidArtifactLayout(other.to_string())),
        }
    }
}

/// Locations of the trained artifacts.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub layout: ArtifactLayout,
    pub pipeline_path: PathBuf,
    pub model_path: PathBuf,
    pub preprocessor_path: PathBuf,
}

impl ModelConfig {
    pub fn source(&self) -> ArtifactSource {
        match self.layout {
            ArtifactLayout::Pipeline => ArtifactSource::Pipeline {
                path: self.pipeline_path.clone(),
            },
            ArtifactLayout::Split => ArtifactSource::Split {
                model: self.model_path.clone(),
                preprocessor: self.preprocessor_path.clone(),
            },
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidArtifactLayout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'pretty' (found '{value}')")
            }
            ConfigError::InvalidArtifactLayout(value) => write!(
                f,
                "LOAN_ARTIFACT_LAYOUT must be 'pipeline' or 'split' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidArtifactLayout(_) => None,
        }
    }
}
