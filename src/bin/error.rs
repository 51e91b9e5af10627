//! CLI Error types and handling
//!
//! This module defines error types specific to CLI operations.

use kafka_harness::HarnessError;
use std::fmt;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    ClusterError {
        kind: ClusterErrorKind,
        message: String,
    },
    UnknownCommand(String),
    NoCommand,
    ConfigurationError(String),
    IoError(String),
    ParseError {
        field: String,
        message: String,
    },
}

#[derive(Debug)]
pub enum ClusterErrorKind {
    StartupFailure,
    ShutdownFailure,
    TopicCreation,
    OperationFailed,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ClusterError { kind, message } => {
                write!(f, "Cluster error ({:?}): {}", kind, message)
            }
            CliError::UnknownCommand(cmd) => {
                write!(f, "Unknown command '{}'. Use --help to see available commands", cmd)
            }
            CliError::NoCommand => {
                write!(f, "No command provided. Use --help to see available commands")
            }
            CliError::ConfigurationError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CliError::IoError(msg) => {
                write!(f, "IO error: {}", msg)
            }
            CliError::ParseError { field, message } => {
                if field.is_empty() {
                    write!(f, "Parse error: {}", message)
                } else {
                    write!(f, "Parse error ({}): {}", field, message)
                }
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError(err.to_string())
    }
}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        match err {
            HarnessError::Io(e) => CliError::IoError(e.to_string()),
            HarnessError::Configuration(msg) => CliError::ConfigurationError(msg),
            e @ (HarnessError::Toml(_)
            | HarnessError::Yaml(_)
            | HarnessError::Json(_)
            | HarnessError::Properties(_)
            | HarnessError::DistributionNotFound(_)) => CliError::ConfigurationError(e.to_string()),
            e @ HarnessError::StartupTimeout { .. } => CliError::ClusterError {
                kind: ClusterErrorKind::StartupFailure,
                message: e.to_string(),
            },
            e @ HarnessError::CommandFailed { .. } => CliError::ClusterError {
                kind: ClusterErrorKind::TopicCreation,
                message: e.to_string(),
            },
            e => CliError::ClusterError {
                kind: ClusterErrorKind::OperationFailed,
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = CliError::ParseError {
            field: "partitions".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(err.to_string(), "Parse error (partitions): must be at least 1");
    }

    #[test]
    fn test_harness_error_conversion() {
        let err: CliError = HarnessError::Configuration("KAFKA_HOME is not set".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: KAFKA_HOME is not set");

        let err: CliError = HarnessError::NotRunning.into();
        assert!(matches!(
            err,
            CliError::ClusterError {
                kind: ClusterErrorKind::OperationFailed,
                ..
            }
        ));
    }
}
