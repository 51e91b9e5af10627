use super::{load_settings, parse_positive};
use crate::error::{CliError, CliResult};
use clap::ArgMatches;
use kafka_harness::provision::ClusterLayout;

pub async fn handle_render_command(matches: &ArgMatches) -> CliResult<()> {
    let out = matches.value_of("out").ok_or_else(|| CliError::ParseError {
        field: "out".to_string(),
        message: "Output directory is not specified. Please use the --out option.".to_string(),
    })?;

    let mut settings = load_settings(matches)?;
    if let Some(brokers) = parse_positive::<u32>(matches, "brokers")? {
        settings.cluster.kafka.brokers = brokers;
    }
    if let Some(port) = parse_positive::<u16>(matches, "port")? {
        settings.cluster.kafka.port = Some(port);
    }

    let layout = ClusterLayout::resolve(&settings.cluster_config(), out)?;
    layout.write()?;

    println!(
        "Rendered {} properties file(s) to {}",
        layout.nodes().count(),
        layout.work_dir().display()
    );
    for node in layout.nodes() {
        println!(
            "  {:<10} {:<24} port {:<5} {}",
            node.kind.to_string(),
            node.name,
            node.port,
            node.properties_file.display()
        );
    }
    println!("zookeeper.connect={}", layout.zookeeper_connect());
    println!("bootstrap.servers={}", layout.bootstrap_servers());
    if let Some(url) = layout.connect_url() {
        println!("connect.url={}", url);
    }
    Ok(())
}
