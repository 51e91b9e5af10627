use super::parse_positive;
use crate::error::{CliError, CliResult};
use clap::ArgMatches;
use kafka_harness::topic::TopicConfig;

fn parse_property(raw: &str) -> CliResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(CliError::ParseError {
            field: "config".to_string(),
            message: format!("Expected NAME=VALUE, got '{}'", raw),
        }),
    }
}

pub async fn handle_topic_command(matches: &ArgMatches) -> CliResult<()> {
    let name = matches.value_of("name").ok_or_else(|| CliError::ParseError {
        field: "name".to_string(),
        message: "Topic name is not specified. Please use the --name option.".to_string(),
    })?;

    let mut builder = TopicConfig::with_name(name);
    if let Some(partitions) = parse_positive::<u32>(matches, "partitions")? {
        builder = builder.with_number_of_partitions(partitions);
    }
    if let Some(replicas) = parse_positive::<u32>(matches, "replicas")? {
        builder = builder.with_number_of_replicas(replicas);
    }
    if let Some(values) = matches.values_of("config") {
        for raw in values {
            let (property, value) = parse_property(raw)?;
            builder = builder.with(property, value);
        }
    }

    let config = if matches.is_present("defaults") {
        builder.use_defaults()
    } else {
        builder.build()
    };

    let json = serde_json::to_string_pretty(&config).map_err(|e| CliError::ParseError {
        field: String::new(),
        message: e.to_string(),
    })?;
    println!("{}", json);
    Ok(())
}
