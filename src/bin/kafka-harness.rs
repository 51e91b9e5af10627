use clap::{App, Arg, ArgMatches, SubCommand};
use kafka_harness::settings::HarnessSettings;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::error::Error;

mod commands;
mod error;

use commands::*;
use error::CliError;

fn config_arg() -> Arg<'static> {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Settings file (.toml, .yaml, .yml or .json)")
        .required(false)
}

fn build_cli() -> App<'static> {
    App::new("kafka-harness")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Kenny (Miller) Song")
        .about("Embedded Kafka cluster harness")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enables debug logging")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Write the properties files of a cluster")
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .value_name("DIR")
                        .help("Sets the output directory")
                        .required(true),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("brokers")
                        .short('b')
                        .long("brokers")
                        .value_name("BROKERS")
                        .help("Sets the number of brokers")
                        .required(false),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the listener port of the first broker")
                        .required(false),
                ),
        )
        .subcommand(
            SubCommand::with_name("topic")
                .about("Print a topic creation request as JSON")
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .value_name("NAME")
                        .help("Specify the topic name")
                        .required(true),
                )
                .arg(
                    Arg::new("partitions")
                        .short('p')
                        .long("partitions")
                        .value_name("PARTITIONS")
                        .help("Sets the number of partitions")
                        .required(false),
                )
                .arg(
                    Arg::new("replicas")
                        .short('r')
                        .long("replicas")
                        .value_name("REPLICAS")
                        .help("Sets the number of replicas")
                        .required(false),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("NAME=VALUE")
                        .help("Sets a topic property")
                        .multiple_occurrences(true)
                        .required(false),
                )
                .arg(
                    Arg::new("defaults")
                        .long("defaults")
                        .help("Ignores all other options and uses the default topic settings")
                        .required(false),
                ),
        )
        .subcommand(
            SubCommand::with_name("start")
                .about("Start the cluster and run until Ctrl-C")
                .arg(config_arg()),
        )
}

/// `-v` wins, then the settings file of `render` or `start`, then the environment.
///
/// A settings file that fails to load is reported by the command itself.
fn log_level(matches: &ArgMatches) -> LevelFilter {
    if matches.is_present("verbose") {
        return LevelFilter::Debug;
    }
    let settings = match matches.subcommand() {
        Some(("render" | "start", sub_matches)) => load_settings(sub_matches).ok(),
        _ => None,
    };
    let settings = settings.unwrap_or_else(|| {
        let mut settings = HarnessSettings::default();
        settings.apply_env_overrides();
        settings
    });
    settings.log_level_filter()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let matches = build_cli().get_matches();

    if let Err(e) = TermLogger::init(
        log_level(&matches),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let result = match matches.subcommand() {
        Some(("render", sub_matches)) => handle_render_command(sub_matches).await,
        Some(("topic", sub_matches)) => handle_topic_command(sub_matches).await,
        Some(("start", sub_matches)) => handle_start_command(sub_matches).await,
        Some((cmd, _)) => Err(CliError::UnknownCommand(cmd.to_string())),
        None => Err(CliError::NoCommand),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;

    #[test]
    fn test_topic_arguments() {
        let matches = build_cli().get_matches_from(vec![
            "kafka-harness",
            "topic",
            "--name",
            "orders",
            "--config",
            "cleanup.policy=compact",
            "--config",
            "retention.ms=1000",
        ]);
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "topic");
        assert_eq!(sub_matches.value_of("name"), Some("orders"));
        assert_eq!(sub_matches.values_of("config").unwrap().count(), 2);

        let rt = Runtime::new().unwrap();
        assert!(rt.block_on(handle_topic_command(sub_matches)).is_ok());
    }

    #[test]
    fn test_render_rejects_zero_brokers() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let matches = build_cli().get_matches_from(vec![
            "kafka-harness",
            "render",
            "--out",
            out,
            "--brokers",
            "0",
        ]);
        let (_, sub_matches) = matches.subcommand().unwrap();

        let rt = Runtime::new().unwrap();
        let result = rt.block_on(handle_render_command(sub_matches));
        assert!(matches!(result, Err(CliError::ParseError { .. })));
    }

    #[test]
    fn test_verbose_is_global() {
        let matches =
            build_cli().get_matches_from(vec!["kafka-harness", "topic", "--name", "t", "-v"]);
        assert_eq!(log_level(&matches), LevelFilter::Debug);
    }

    #[test]
    fn test_log_level_from_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("harness.toml");
        std::fs::write(&settings, "log_level = \"warn\"\n").unwrap();
        let settings = settings.to_str().unwrap();
        let out = dir.path().to_str().unwrap();

        let matches = build_cli().get_matches_from(vec![
            "kafka-harness",
            "render",
            "--out",
            out,
            "--config",
            settings,
        ]);
        assert_eq!(log_level(&matches), LevelFilter::Warn);

        let matches = build_cli().get_matches_from(vec![
            "kafka-harness",
            "render",
            "--out",
            out,
            "--config",
            settings,
            "-v",
        ]);
        assert_eq!(log_level(&matches), LevelFilter::Debug);
    }

    #[test]
    fn test_topic_config_is_not_a_settings_file() {
        let matches = build_cli().get_matches_from(vec![
            "kafka-harness",
            "topic",
            "--name",
            "t",
            "--config",
            "log_level=debug",
        ]);
        assert_ne!(log_level(&matches), LevelFilter::Debug);
    }
}
