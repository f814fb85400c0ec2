use crate::workflows::dossier::{
    CaseFamily, ClassifierThresholds, DEFAULT_MIN_CONFIDENCE, DEFAULT_NORMALIZATION_PER_CHECK,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_RULES_PATH: &str = "config/rules.yml";

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
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat(value))?,
            Err(_) => LogFormat::Compact,
        };

        let rules_path = env::var("APP_RULES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_RULES_PATH));

        let default_case_type = match env::var("APP_DEFAULT_CASE_TYPE") {
            Ok(value) => value
                .parse::<CaseFamily>()
                .map_err(|_| ConfigError::InvalidCaseType(value))?,
            Err(_) => CaseFamily::default(),
        };

        let min_confidence =
            threshold_var("APP_CLASSIFIER_MIN_CONFIDENCE", DEFAULT_MIN_CONFIDENCE)?;
        let normalization =
            threshold_var("APP_CLASSIFIER_NORMALIZATION", DEFAULT_NORMALIZATION_PER_CHECK)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            analysis: AnalysisConfig {
                rules_path,
                default_case_type,
                thresholds: ClassifierThresholds::new(min_confidence, normalization),
            },
        })
    }
}

fn threshold_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .ok_or(ConfigError::InvalidThreshold { name, value }),
        Err(_) => Ok(default),
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Inputs of the dossier analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub rules_path: PathBuf,
    pub default_case_type: CaseFamily,
    pub thresholds: ClassifierThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES_PATH),
            default_case_type: CaseFamily::default(),
            thresholds: ClassifierThresholds::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidCaseType(String),
    InvalidThreshold { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{value}'")
            }
            ConfigError::InvalidCaseType(value) => {
                write!(f, "APP_DEFAULT_CASE_TYPE must be 'PC' or 'PA', got '{value}'")
            }
            ConfigError::InvalidThreshold { name, value } => {
                write!(f, "{name} must be a finite number, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "APP_RULES_PATH",
            "APP_DEFAULT_CASE_TYPE",
            "APP_CLASSIFIER_MIN_CONFIDENCE",
            "APP_CLASSIFIER_NORMALIZATION",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.analysis.rules_path, PathBuf::from(DEFAULT_RULES_PATH));
        assert_eq!(config.analysis.default_case_type, CaseFamily::Construction);
        assert_eq!(config.analysis.thresholds, ClassifierThresholds::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn analysis_settings_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_LOG_FORMAT", "JSON");
        env::set_var("APP_RULES_PATH", "/etc/aqua/rules.yml");
        env::set_var("APP_DEFAULT_CASE_TYPE", "pa");
        env::set_var("APP_CLASSIFIER_MIN_CONFIDENCE", "0.35");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(
            config.analysis.rules_path,
            PathBuf::from("/etc/aqua/rules.yml")
        );
        assert_eq!(config.analysis.default_case_type, CaseFamily::Subdivision);
        assert!((config.analysis.thresholds.min_confidence - 0.35).abs() < f64::EPSILON);
        reset_env();
    }

    #[test]
    fn rejects_invalid_analysis_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DEFAULT_CASE_TYPE", "DP");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCaseType(value)) if value == "DP"
        ));

        reset_env();
        env::set_var("APP_CLASSIFIER_NORMALIZATION", "abc");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidThreshold { name: "APP_CLASSIFIER_NORMALIZATION", .. })
        ));

        reset_env();
        env::set_var("APP_LOG_FORMAT", "xml");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidLogFormat(_))
        ));
        reset_env();
    }
}
