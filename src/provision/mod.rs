//! Module for turning a [`ClusterConfig`](crate::cluster::ClusterConfig) into
//! running processes.
//!
//! It includes the following submodules:
//! * [`layout`]: Resolves ports, directories and per-node properties files.
//! * [`distribution`]: Locates the scripts of an Apache Kafka installation.
//! * [`embedded`]: Starts and stops the cluster as child processes.
//!
//! # Example
//! ```
//! use kafka_harness::cluster::{ClusterConfig, KafkaConfig, ZooKeeperConfig};
//! use kafka_harness::provision::ClusterLayout;
//!
//! let config = ClusterConfig::builder()
//!     .configure_zookeeper(ZooKeeperConfig::builder().with_port(2181))
//!     .configure_kafka(KafkaConfig::builder().with_number_of_brokers(2).with_port(9092))
//!     .build();
//!
//! let layout = ClusterLayout::resolve(&config, "/tmp/kafka-harness").unwrap();
//! assert_eq!(layout.bootstrap_servers(), "localhost:9092,localhost:9093");
//! ```

pub mod distribution;
pub mod embedded;
pub mod layout;

pub use self::distribution::{KafkaDistribution, LaunchCommand};
pub use self::embedded::EmbeddedKafkaCluster;
pub use self::layout::{ClusterLayout, ConnectLayout, NodeKind, NodeLayout};
