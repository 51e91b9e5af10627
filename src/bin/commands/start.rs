use super::load_settings;
use crate::error::{CliError, CliResult, ClusterErrorKind};
use clap::ArgMatches;
use kafka_harness::provision::EmbeddedKafkaCluster;
use log::{error, info};

pub async fn handle_start_command(matches: &ArgMatches) -> CliResult<()> {
    let settings = load_settings(matches)?;
    let distribution = settings.distribution()?;

    let mut cluster = EmbeddedKafkaCluster::provision(settings.cluster_config(), distribution)
        .with_startup_timeout(settings.startup_timeout());
    cluster.start().await?;

    for topic in settings.topic_configs() {
        if let Err(e) = cluster.create_topic(&topic).await {
            error!("Failed to create topic '{}': {}", topic.topic(), e);
            cluster.stop().await?;
            return Err(e.into());
        }
    }

    println!("bootstrap.servers={}", cluster.bootstrap_servers()?);
    println!("zookeeper.connect={}", cluster.zookeeper_connect()?);
    if let Some(url) = cluster.layout().and_then(|l| l.connect_url()) {
        println!("connect.url={}", url);
    }
    println!("Press Ctrl-C to stop the cluster");

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C, shutting down");

    cluster.stop().await.map_err(|e| CliError::ClusterError {
        kind: ClusterErrorKind::ShutdownFailure,
        message: e.to_string(),
    })
}
