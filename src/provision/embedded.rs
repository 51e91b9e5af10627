use crate::cluster::ClusterConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::properties::Properties;
use crate::provision::distribution::{KafkaDistribution, LaunchCommand};
use crate::provision::layout::{ClusterLayout, ConnectLayout, NodeLayout};
use crate::topic::TopicConfig;
use log::{debug, error, info, warn};
use reqwest::StatusCode;
use std::process::Stdio;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::process::Child;
use tokio::time::{Duration, Instant, sleep};

const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct RunningNode {
    name: String,
    command: String,
    child: Child,
}

/// A Kafka cluster running as child processes of the current test.
///
/// The cluster owns a temporary working directory holding every properties
/// file and data directory; it is removed on [`stop`](Self::stop) or drop.
/// Child processes are killed when the cluster is dropped.
pub struct EmbeddedKafkaCluster {
    config: ClusterConfig,
    distribution: KafkaDistribution,
    startup_timeout: Duration,
    work_dir: Option<TempDir>,
    layout: Option<ClusterLayout>,
    processes: Vec<RunningNode>,
}

impl EmbeddedKafkaCluster {
    pub fn provision(config: ClusterConfig, distribution: KafkaDistribution) -> Self {
        Self {
            config,
            distribution,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            work_dir: None,
            layout: None,
            processes: Vec::new(),
        }
    }

    /// Sets how long each node may take to open its port.
    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        !self.processes.is_empty()
    }

    pub fn layout(&self) -> Option<&ClusterLayout> {
        self.layout.as_ref()
    }

    pub fn bootstrap_servers(&self) -> HarnessResult<String> {
        self.running_layout().map(ClusterLayout::bootstrap_servers)
    }

    pub fn zookeeper_connect(&self) -> HarnessResult<String> {
        self.running_layout().map(ClusterLayout::zookeeper_connect)
    }

    /// Starts ZooKeeper, the brokers and, if configured, Kafka Connect.
    ///
    /// On failure every process started so far is stopped again.
    pub async fn start(&mut self) -> HarnessResult<()> {
        if self.is_running() {
            return Err(HarnessError::AlreadyRunning);
        }
        self.distribution.verify()?;

        let work_dir = tempfile::Builder::new()
            .prefix("kafka-harness-")
            .tempdir()?;
        let layout = ClusterLayout::resolve(&self.config, work_dir.path())?;
        layout.write()?;
        self.work_dir = Some(work_dir);
        self.layout = Some(layout.clone());

        if let Err(e) = self.launch(&layout).await {
            error!("Failed to start embedded cluster ({}): {}", e.category(), e);
            self.shutdown().await;
            return Err(e);
        }

        info!(
            "Embedded cluster is up: bootstrap servers {}",
            layout.bootstrap_servers()
        );
        Ok(())
    }

    /// Stops all processes in reverse start order and removes the working directory.
    pub async fn stop(&mut self) -> HarnessResult<()> {
        if !self.is_running() {
            return Err(HarnessError::NotRunning);
        }
        self.shutdown().await;
        info!("Embedded cluster stopped");
        Ok(())
    }

    /// Creates `topic` through the distribution's `kafka-topics` tool.
    pub async fn create_topic(&self, topic: &TopicConfig) -> HarnessResult<()> {
        let layout = self.running_layout()?;
        let command = self
            .distribution
            .create_topic_command(topic, &layout.bootstrap_servers());
        debug!("Running {}", command);

        let status = command
            .to_command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if !status.success() {
            return Err(HarnessError::CommandFailed {
                command: command.to_string(),
                status,
            });
        }
        info!(
            "Created topic '{}' with {} partition(s) and {} replica(s)",
            topic.topic(),
            topic.number_of_partitions(),
            topic.number_of_replicas()
        );
        Ok(())
    }

    fn running_layout(&self) -> HarnessResult<&ClusterLayout> {
        match &self.layout {
            Some(layout) if self.is_running() => Ok(layout),
            _ => Err(HarnessError::NotRunning),
        }
    }

    async fn launch(&mut self, layout: &ClusterLayout) -> HarnessResult<()> {
        let command = self.distribution.zookeeper_command(layout.zookeeper());
        self.spawn_and_wait(layout.zookeeper(), command).await?;

        for broker in layout.brokers() {
            let command = self.distribution.broker_command(broker);
            self.spawn_and_wait(broker, command).await?;
        }

        if let Some(connect) = layout.connect() {
            let command = self.distribution.connect_command(&connect.worker);
            self.spawn_and_wait(&connect.worker, command).await?;
            self.deploy_connectors(connect).await?;
        }
        Ok(())
    }

    async fn spawn_and_wait(
        &mut self,
        node: &NodeLayout,
        command: LaunchCommand,
    ) -> HarnessResult<()> {
        info!("Starting {} ({}) on port {}", node.name, node.kind, node.port);
        debug!("Running {}", command);

        let child = command
            .to_command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        self.processes.push(RunningNode {
            name: node.name.clone(),
            command: command.to_string(),
            child,
        });

        let timeout = self.startup_timeout;
        match self.processes.last_mut() {
            Some(running) => wait_for_port(running, node.port, timeout).await,
            None => Err(HarnessError::NotRunning),
        }
    }

    async fn deploy_connectors(&self, connect: &ConnectLayout) -> HarnessResult<()> {
        let client = reqwest::Client::new();
        let url = format!("{}/connectors", connect.url());

        for connector in &connect.connectors {
            let body = connector_request(connector)?;
            let deadline = Instant::now() + self.startup_timeout;
            loop {
                let response = client
                    .post(&url)
                    .json(&body)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status());
                match response {
                    Ok(_) => break,
                    // The REST server accepts connections before the worker has joined its group.
                    Err(e) if is_retryable(&e) && Instant::now() < deadline => {
                        debug!("Connect worker not ready yet: {}", e);
                        sleep(POLL_INTERVAL * 5).await;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            info!(
                "Deployed connector '{}'",
                body["name"].as_str().unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        while let Some(mut node) = self.processes.pop() {
            if let Ok(Some(status)) = node.child.try_wait() {
                debug!("{} already exited with {}", node.name, status);
                continue;
            }
            match node.child.kill().await {
                Ok(()) => info!("Stopped {}", node.name),
                Err(e) => warn!("Failed to stop {}: {}", node.name, e),
            }
        }
        self.layout = None;
        if let Some(work_dir) = self.work_dir.take() {
            if let Err(e) = work_dir.close() {
                warn!("Failed to remove working directory: {}", e);
            }
        }
    }
}

/// Builds the Connect REST payload for a connector's properties.
fn connector_request(connector: &Properties) -> HarnessResult<serde_json::Value> {
    let name = connector.get("name").ok_or_else(|| {
        HarnessError::Configuration("connector is missing the 'name' property".to_string())
    })?;
    Ok(serde_json::json!({
        "name": name,
        "config": connector.to_map(),
    }))
}

/// Connection failures, `409 Conflict` during a rebalance and server errors
/// are transient; any other status means the request itself is wrong.
fn is_retryable(error: &reqwest::Error) -> bool {
    match error.status() {
        Some(status) => status == StatusCode::CONFLICT || status.is_server_error(),
        None => error.is_connect() || error.is_timeout(),
    }
}

/// Polls `port` until it accepts connections.
///
/// Fails early with [`HarnessError::CommandFailed`] if the node's process exits.
async fn wait_for_port(node: &mut RunningNode, port: u16, timeout: Duration) -> HarnessResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = node.child.try_wait()? {
            error!("{} exited during startup with {}", node.name, status);
            return Err(HarnessError::CommandFailed {
                command: node.command.clone(),
                status,
            });
        }
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            debug!("{} is accepting connections on port {}", node.name, port);
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::StartupTimeout {
                component: node.name.clone(),
                port,
                timeout,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}
