use crate::error::AppError;
use config::{Config as Cfg, ConfigBuilder, File, builder::DefaultState};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_level: LogLevel::Info,
        }
    }
}

/// Values as they arrive from the environment, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    port: Option<String>,
    log_level: Option<String>,
}

/// A setting that could not be parsed and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    InvalidPort(String),
    InvalidLogLevel(String),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::InvalidPort(value) => {
                write!(f, "invalid PORT {:?}, using {}", value, DEFAULT_PORT)
            }
            ConfigWarning::InvalidLogLevel(value) => {
                write!(f, "invalid LOG_LEVEL {:?}, using info", value)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "fatal" | "panic" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Config {
    /// Loads `.env`, an optional `configuration` file and the process
    /// environment (`PORT`, `LOG_LEVEL`).
    ///
    /// Unparseable values never fail the load: they fall back to their
    /// defaults and are reported as warnings for the caller to log once
    /// tracing is up.
    pub fn load() -> Result<(Self, Vec<ConfigWarning>), AppError> {
        dotenvy::dotenv().ok();

        let builder = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::default());

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<(Self, Vec<ConfigWarning>), AppError> {
        let raw: RawConfig = builder.build()?.try_deserialize()?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> (Self, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();
        let mut config = Config::default();

        if let Some(port) = raw.port.filter(|p| !p.trim().is_empty()) {
            match port.trim().parse::<u16>() {
                Ok(parsed) => config.port = parsed,
                Err(_) => warnings.push(ConfigWarning::InvalidPort(port)),
            }
        }

        if let Some(level) = raw.log_level.filter(|l| !l.trim().is_empty()) {
            match level.parse::<LogLevel>() {
                Ok(parsed) => config.log_level = parsed,
                Err(_) => warnings.push(ConfigWarning::InvalidLogLevel(level)),
            }
        }

        (config, warnings)
    }
}
