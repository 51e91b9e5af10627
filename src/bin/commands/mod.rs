pub mod render;
pub mod start;
pub mod topic;

pub use render::handle_render_command;
pub use start::handle_start_command;
pub use topic::handle_topic_command;

use crate::error::{CliError, CliResult};
use clap::ArgMatches;
use kafka_harness::settings::{HarnessSettings, load_settings_from_path};
use std::path::Path;
use std::str::FromStr;

/// Reads `--config` if given, then applies environment overrides.
pub(crate) fn load_settings(matches: &ArgMatches) -> CliResult<HarnessSettings> {
    let mut settings = match matches.value_of("config") {
        Some(path) => load_settings_from_path(Path::new(path))?,
        None => HarnessSettings::default(),
    };
    settings.apply_env_overrides();
    Ok(settings)
}

/// Parses an optional numeric option, rejecting zero.
pub(crate) fn parse_positive<T>(matches: &ArgMatches, field: &str) -> CliResult<Option<T>>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let raw = match matches.value_of(field) {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let value: T = raw.parse().map_err(|e| CliError::ParseError {
        field: field.to_string(),
        message: format!("Invalid value '{}': {} (Please specify a positive integer)", raw, e),
    })?;
    if value == T::default() {
        return Err(CliError::ParseError {
            field: field.to_string(),
            message: format!("--{} must be at least 1.", field),
        });
    }
    Ok(Some(value))
}
