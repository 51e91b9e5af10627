//! Resolution of a [`ClusterConfig`] into concrete nodes on disk.
//!
//! The layout decides every value that only makes sense for a single run:
//! listener ports, data directories, broker ids and the connection strings
//! that tie the nodes together. Keys owned by the layout always overwrite
//! whatever the configuration carried.

use crate::cluster::ClusterConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::properties::Properties;
use log::{debug, info};
use std::fmt;
use std::net::TcpListener;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    ZooKeeper,
    Broker,
    Connect,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::ZooKeeper => write!(f, "zookeeper"),
            NodeKind::Broker => write!(f, "broker"),
            NodeKind::Connect => write!(f, "connect"),
        }
    }
}

/// A single process of the cluster and the file it is configured from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLayout {
    pub kind: NodeKind,
    pub name: String,
    pub port: u16,
    pub properties: Properties,
    pub properties_file: PathBuf,
}

impl NodeLayout {
    pub fn write(&self) -> HarnessResult<()> {
        debug!(
            "Writing {} properties for {} to {}",
            self.properties.len(),
            self.name,
            self.properties_file.display()
        );
        self.properties.write_to_file(&self.properties_file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectLayout {
    pub worker: NodeLayout,
    pub connectors: Vec<Properties>,
}

impl ConnectLayout {
    /// Base URL of the worker's REST API.
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.worker.port)
    }
}

/// Ports, directories and per-node properties of one cluster run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterLayout {
    work_dir: PathBuf,
    zookeeper: NodeLayout,
    brokers: Vec<NodeLayout>,
    connect: Option<ConnectLayout>,
}

impl ClusterLayout {
    /// Assigns ports and directories below `work_dir` for every node.
    ///
    /// Nothing is written to disk; call [`ClusterLayout::write`] for that.
    pub fn resolve(config: &ClusterConfig, work_dir: impl AsRef<Path>) -> HarnessResult<Self> {
        let work_dir = work_dir.as_ref().to_path_buf();
        let mut ports = PortAllocator::default();

        let zookeeper_port = match config.zookeeper().port() {
            Some(port) => port,
            None => ports.allocate()?,
        };
        let mut zk_props = config.zookeeper().properties().clone();
        zk_props.set_if_absent("maxClientCnxns", 0);
        zk_props.set_if_absent("admin.enableServer", false);
        zk_props.set("clientPort", zookeeper_port);
        zk_props.set("dataDir", work_dir.join("zookeeper").display());
        let zookeeper = NodeLayout {
            kind: NodeKind::ZooKeeper,
            name: "zookeeper".to_string(),
            port: zookeeper_port,
            properties: zk_props,
            properties_file: work_dir.join("zookeeper.properties"),
        };
        let zookeeper_connect = format!("localhost:{}", zookeeper_port);

        let kafka = config.kafka();
        let mut brokers = Vec::with_capacity(kafka.number_of_brokers() as usize);
        for broker_id in 0..kafka.number_of_brokers() {
            let port = match kafka.port() {
                Some(base) => u16::try_from(broker_id)
                    .ok()
                    .and_then(|offset| base.checked_add(offset))
                    .ok_or_else(|| {
                        HarnessError::Configuration(format!(
                            "broker {} does not fit above base port {}",
                            broker_id, base
                        ))
                    })?,
                None => ports.allocate()?,
            };
            let mut props = kafka.broker_properties().clone();
            props.set("broker.id", broker_id);
            props.set("listeners", format!("PLAINTEXT://localhost:{}", port));
            props.set(
                "log.dirs",
                work_dir.join(format!("kafka-{}", broker_id)).display(),
            );
            props.set("zookeeper.connect", &zookeeper_connect);
            brokers.push(NodeLayout {
                kind: NodeKind::Broker,
                name: format!("broker-{}", broker_id),
                port,
                properties: props,
                properties_file: work_dir.join(format!("broker-{}.properties", broker_id)),
            });
        }
        let bootstrap_servers = join_bootstrap(&brokers);

        let connect = match config.connect() {
            Some(connect) => {
                let rest_port = ports.allocate()?;
                let mut props = connect.properties().clone();
                props.set("bootstrap.servers", &bootstrap_servers);
                props.set("listeners", format!("http://localhost:{}", rest_port));
                props.set("rest.port", rest_port);
                Some(ConnectLayout {
                    worker: NodeLayout {
                        kind: NodeKind::Connect,
                        name: connect.worker_id().to_string(),
                        port: rest_port,
                        properties: props,
                        properties_file: work_dir.join("connect-worker.properties"),
                    },
                    connectors: connect.connectors().to_vec(),
                })
            }
            None => None,
        };

        info!(
            "Resolved cluster layout in {}: zookeeper on {}, brokers at {}",
            work_dir.display(),
            zookeeper_port,
            bootstrap_servers
        );

        Ok(Self {
            work_dir,
            zookeeper,
            brokers,
            connect,
        })
    }

    /// Writes the properties file of every node.
    pub fn write(&self) -> HarnessResult<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        for node in self.nodes() {
            node.write()?;
        }
        Ok(())
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn zookeeper(&self) -> &NodeLayout {
        &self.zookeeper
    }

    pub fn brokers(&self) -> &[NodeLayout] {
        &self.brokers
    }

    pub fn connect(&self) -> Option<&ConnectLayout> {
        self.connect.as_ref()
    }

    /// All nodes in start order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeLayout> {
        std::iter::once(&self.zookeeper)
            .chain(self.brokers.iter())
            .chain(self.connect.iter().map(|c| &c.worker))
    }

    pub fn zookeeper_connect(&self) -> String {
        format!("localhost:{}", self.zookeeper.port)
    }

    pub fn connect_url(&self) -> Option<String> {
        self.connect.as_ref().map(ConnectLayout::url)
    }

    /// Comma separated `host:port` list of all brokers.
    pub fn bootstrap_servers(&self) -> String {
        join_bootstrap(&self.brokers)
    }
}

fn join_bootstrap(brokers: &[NodeLayout]) -> String {
    brokers
        .iter()
        .map(|b| format!("localhost:{}", b.port))
        .collect::<Vec<_>>()
        .join(",")
}

/// Hands out free ephemeral ports.
///
/// Listeners stay bound until the allocator is dropped so that two calls
/// never return the same port.
#[derive(Default)]
struct PortAllocator {
    reserved: Vec<TcpListener>,
}

impl PortAllocator {
    fn allocate(&mut self) -> HarnessResult<u16> {
        let listener = TcpListener::bind(("127.0.0.1", 0))?;
        let port = listener.local_addr()?.port();
        self.reserved.push(listener);
        Ok(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ConnectConfig, KafkaConfig, ZooKeeperConfig};
    use std::collections::HashSet;

    #[test]
    fn test_explicit_ports() {
        let config = ClusterConfig::builder()
            .configure_zookeeper(ZooKeeperConfig::builder().with_port(2181))
            .configure_kafka(
                KafkaConfig::builder()
                    .with_number_of_brokers(3)
                    .with_port(9092),
            )
            .build();
        let layout = ClusterLayout::resolve(&config, "/tmp/cluster").unwrap();

        assert_eq!(layout.zookeeper().port, 2181);
        assert_eq!(layout.zookeeper_connect(), "localhost:2181");
        assert_eq!(
            layout.bootstrap_servers(),
            "localhost:9092,localhost:9093,localhost:9094"
        );
        let second = &layout.brokers()[1];
        assert_eq!(second.name, "broker-1");
        assert_eq!(second.properties.get("broker.id"), Some("1"));
        assert_eq!(
            second.properties.get("listeners"),
            Some("PLAINTEXT://localhost:9093")
        );
        assert_eq!(
            second.properties.get("zookeeper.connect"),
            Some("localhost:2181")
        );
        assert_eq!(
            second.properties_file,
            PathBuf::from("/tmp/cluster/broker-1.properties")
        );
    }

    #[test]
    fn test_ephemeral_ports_are_distinct() {
        let config = ClusterConfig::builder()
            .configure_kafka(KafkaConfig::builder().with_number_of_brokers(3))
            .configure_connect(ConnectConfig::use_defaults())
            .build();
        let layout = ClusterLayout::resolve(&config, "/tmp/cluster").unwrap();

        let ports: HashSet<u16> = layout.nodes().map(|n| n.port).collect();
        assert_eq!(ports.len(), 5);
        assert!(ports.iter().all(|p| *p > 0));
    }

    #[test]
    fn test_port_overflow_is_rejected() {
        let config = ClusterConfig::builder()
            .configure_kafka(
                KafkaConfig::builder()
                    .with_number_of_brokers(2)
                    .with_port(u16::MAX),
            )
            .build();
        let result = ClusterLayout::resolve(&config, "/tmp/cluster");
        assert!(matches!(result, Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_layout_owned_keys_override_config() {
        let config = ClusterConfig::builder()
            .configure_zookeeper(
                ZooKeeperConfig::builder()
                    .with_port(2181)
                    .with("clientPort", 1)
                    .with("maxClientCnxns", 10),
            )
            .configure_kafka(KafkaConfig::builder().with("broker.id", 42))
            .build();
        let layout = ClusterLayout::resolve(&config, "/tmp/cluster").unwrap();

        assert_eq!(layout.zookeeper().properties.get("clientPort"), Some("2181"));
        assert_eq!(layout.zookeeper().properties.get("maxClientCnxns"), Some("10"));
        assert_eq!(layout.brokers()[0].properties.get("broker.id"), Some("0"));
    }

    #[test]
    fn test_connect_worker_points_at_brokers() {
        let config = ClusterConfig::builder()
            .configure_kafka(KafkaConfig::builder().with_port(29092))
            .configure_connect(ConnectConfig::builder().with_worker_id("worker-test"))
            .build();
        let layout = ClusterLayout::resolve(&config, "/tmp/cluster").unwrap();
        let connect = layout.connect().unwrap();

        assert_eq!(connect.worker.name, "worker-test");
        assert_eq!(
            connect.worker.properties.get("bootstrap.servers"),
            Some("localhost:29092")
        );
        assert_eq!(connect.url(), format!("http://localhost:{}", connect.worker.port));
        assert_eq!(layout.connect_url(), Some(connect.url()));
        assert_eq!(
            connect.worker.properties.get("rest.port"),
            Some(connect.worker.port.to_string().as_str())
        );
        assert_eq!(layout.nodes().count(), 3);
    }
}
