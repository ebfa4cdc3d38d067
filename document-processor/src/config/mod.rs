use service_core::config::{self as core_config, ConfigWarning};
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const SERVICE_NAME: &str = "document-processor";

#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub common: core_config::Config,
    pub server: ServerSettings,
    pub otlp_endpoint: Option<String>,
}

/// Per-request bounds and the shutdown drain window.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Time allowed to receive the request body.
    pub read_timeout: Duration,
    /// Time allowed to produce the response.
    pub write_timeout: Duration,
    /// Time in-flight requests get to finish once shutdown starts.
    pub shutdown_grace: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(15),
            write_timeout: Duration::from_secs(30),
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

impl DocumentConfig {
    pub fn load() -> Result<(Self, Vec<ConfigWarning>), AppError> {
        let (common, warnings) = core_config::Config::load()?;

        let config = DocumentConfig {
            common,
            server: ServerSettings::default(),
            otlp_endpoint: env::var("OTLP_ENDPOINT")
                .ok()
                .filter(|endpoint| !endpoint.trim().is_empty()),
        };

        Ok((config, warnings))
    }

    /// Defaults with an ephemeral port, for tests and embedding.
    pub fn ephemeral() -> Self {
        let common = core_config::Config {
            port: 0,
            ..Default::default()
        };

        DocumentConfig {
            common,
            server: ServerSettings::default(),
            otlp_endpoint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_bounds_default_to_fixed_values() {
        let server = ServerSettings::default();
        assert_eq!(server.read_timeout, Duration::from_secs(15));
        assert_eq!(server.write_timeout, Duration::from_secs(30));
        assert_eq!(server.shutdown_grace, Duration::from_secs(30));
    }

    #[test]
    fn ephemeral_binds_any_port() {
        let config = DocumentConfig::ephemeral();
        assert_eq!(config.common.port, 0);
        assert!(config.otlp_endpoint.is_none());
    }
}
