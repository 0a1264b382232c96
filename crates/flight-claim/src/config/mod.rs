use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::eligibility::precheck::MAX_ASSUMED_DELAY_MINUTES;
use crate::workflows::eligibility::{CompensationConfig, DistanceBand, PrecheckConfig};

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
    pub eligibility: EligibilitySettings,
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
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            eligibility: EligibilitySettings::from_env()?,
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
    Full,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "verbose" => Self::Full,
            _ => Self::Compact,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Amount table, reference data location and precheck assumption, read at start-up and
/// handed to the engine as plain values.
#[derive(Debug, Clone)]
pub struct EligibilitySettings {
    pub airports_csv: Option<PathBuf>,
    pub compensation: CompensationConfig,
    pub precheck: PrecheckConfig,
}

impl Default for EligibilitySettings {
    fn default() -> Self {
        Self {
            airports_csv: None,
            compensation: CompensationConfig::default(),
            precheck: PrecheckConfig::default(),
        }
    }
}

impl EligibilitySettings {
    fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        settings.airports_csv = env::var("APP_AIRPORTS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        if let Ok(currency) = env::var("APP_COMP_CURRENCY") {
            settings.compensation.currency = currency.trim().to_ascii_uppercase();
        }

        for (band, variable) in [
            (DistanceBand::Short, "APP_COMP_SHORT_AMOUNT"),
            (DistanceBand::Medium, "APP_COMP_MEDIUM_AMOUNT"),
            (DistanceBand::Long, "APP_COMP_LONG_AMOUNT"),
        ] {
            if let Some(amount) = parse_var::<u32>(variable)? {
                settings.compensation.amounts.insert(band, amount);
            }
        }

        if let Some(minutes) = parse_var::<i64>("APP_PRECHECK_ASSUMED_DELAY")? {
            if !PrecheckConfig::assumed_delay_in_range(minutes) {
                return Err(ConfigError::OutOfRange {
                    variable: "APP_PRECHECK_ASSUMED_DELAY",
                    value: minutes,
                    max: MAX_ASSUMED_DELAY_MINUTES,
                });
            }
            settings.precheck.assumed_delay_minutes = minutes;
        }

        Ok(settings)
    }
}

fn parse_var<T: std::str::FromStr>(variable: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { variable, value: raw }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
    OutOfRange { variable: &'static str, value: i64, max: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a whole number, got '{value}'")
            }
            ConfigError::OutOfRange {
                variable,
                value,
                max,
            } => write!(f, "{variable} must be between 1 and {max}, got {value}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
