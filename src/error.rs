use crate::record::EncodingError;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading settings or provisioning a cluster.
///
/// Building configurations never fails; this type only appears once files,
/// processes or the network are involved.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Properties error: {0}")]
    Properties(#[from] java_properties::PropertiesError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Kafka distribution not found at {}", .0.display())]
    DistributionNotFound(PathBuf),

    #[error("Timed out after {timeout:?} waiting for {component} on port {port}")]
    StartupTimeout {
        component: String,
        port: u16,
        timeout: Duration,
    },

    #[error("Command `{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("Cluster is already running")]
    AlreadyRunning,

    #[error("Cluster is not running")]
    NotRunning,
}

pub type HarnessResult<T> = Result<T, HarnessError>;

impl HarnessError {
    /// Short label used when logging failures.
    pub fn category(&self) -> &'static str {
        match self {
            HarnessError::Encoding(_) => "encoding",
            HarnessError::Io(_) => "io",
            HarnessError::Properties(_) => "properties",
            HarnessError::Json(_) | HarnessError::Toml(_) | HarnessError::Yaml(_) => "settings",
            HarnessError::Http(_) => "connect",
            HarnessError::Configuration(_) => "configuration",
            HarnessError::DistributionNotFound(_) => "distribution",
            HarnessError::StartupTimeout { .. } => "timeout",
            HarnessError::CommandFailed { .. } => "command",
            HarnessError::AlreadyRunning | HarnessError::NotRunning => "lifecycle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_from_io_error() {
        let error: HarnessError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert_eq!(error.to_string(), "IO error: disk full");
        assert_eq!(error.category(), "io");
    }

    #[test]
    fn test_startup_timeout_display() {
        let error = HarnessError::StartupTimeout {
            component: "zookeeper".to_string(),
            port: 2181,
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            error.to_string(),
            "Timed out after 30s waiting for zookeeper on port 2181"
        );
    }

    #[test]
    fn test_encoding_error_converts() {
        let error: HarnessError = EncodingError::UnsupportedCharset("EBCDIC".to_string()).into();
        assert_eq!(error.category(), "encoding");
        assert_eq!(error.to_string(), "Encoding error: Unsupported charset: EBCDIC");
    }
}
