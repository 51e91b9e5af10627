//! Module for embedded cluster configuration.
//!
//! This module provides [`ClusterConfig`], an immutable snapshot describing the
//! ZooKeeper instance, the Kafka brokers and the optional Kafka Connect worker
//! of an embedded cluster, and [`ClusterConfigBuilder`] used to assemble it.
//!
//! Every sub-configuration setter accepts either a built config or its
//! builder, so both of the following are equivalent:
//!
//! ```
//! use kafka_harness::cluster::{ClusterConfig, KafkaConfig};
//!
//! let a = ClusterConfig::builder()
//!     .configure_kafka(KafkaConfig::builder().with_number_of_brokers(3))
//!     .build();
//! let b = ClusterConfig::builder()
//!     .configure_kafka(KafkaConfig::builder().with_number_of_brokers(3).build())
//!     .build();
//!
//! assert_eq!(a.kafka(), b.kafka());
//! assert!(!a.uses_connect());
//! ```

pub mod connect;
pub mod kafka;
pub mod zookeeper;

pub use self::connect::{ConnectConfig, ConnectConfigBuilder};
pub use self::kafka::{KafkaConfig, KafkaConfigBuilder};
pub use self::zookeeper::{ZooKeeperConfig, ZooKeeperConfigBuilder};

use log::debug;
use serde::Serialize;

/// Immutable configuration of an embedded Kafka cluster.
///
/// Kafka Connect is enabled exactly when a [`ConnectConfig`] is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterConfig {
    zookeeper: ZooKeeperConfig,
    kafka: KafkaConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    connect: Option<ConnectConfig>,
}

impl ClusterConfig {
    pub fn builder() -> ClusterConfigBuilder {
        ClusterConfigBuilder::default()
    }

    pub fn zookeeper(&self) -> &ZooKeeperConfig {
        &self.zookeeper
    }

    pub fn kafka(&self) -> &KafkaConfig {
        &self.kafka
    }

    pub fn connect(&self) -> Option<&ConnectConfig> {
        self.connect.as_ref()
    }

    pub fn uses_connect(&self) -> bool {
        self.connect.is_some()
    }
}

/// Accumulates the sub-configurations of a [`ClusterConfig`].
///
/// Slots that are never configured fall back to their defaults on
/// [`build`](ClusterConfigBuilder::build).
#[derive(Debug, Clone, Default)]
pub struct ClusterConfigBuilder {
    zookeeper: Option<ZooKeeperConfig>,
    kafka: Option<KafkaConfig>,
    connect: Option<ConnectConfig>,
}

impl ClusterConfigBuilder {
    /// Uses the given configuration for the ZooKeeper instance.
    pub fn configure_zookeeper(mut self, config: impl Into<ZooKeeperConfig>) -> Self {
        self.zookeeper = Some(config.into());
        self
    }

    /// Uses the given configuration for all brokers of the cluster.
    pub fn configure_kafka(mut self, config: impl Into<KafkaConfig>) -> Self {
        self.kafka = Some(config.into());
        self
    }

    /// Enables Kafka Connect with the given worker configuration.
    pub fn configure_connect(mut self, config: impl Into<ConnectConfig>) -> Self {
        self.connect = Some(config.into());
        self
    }

    pub fn build(self) -> ClusterConfig {
        let config = ClusterConfig {
            zookeeper: self.zookeeper.unwrap_or_default(),
            kafka: self.kafka.unwrap_or_default(),
            connect: self.connect,
        };
        debug!(
            "Built cluster config: {} broker(s), connect {}",
            config.kafka.number_of_brokers(),
            if config.uses_connect() { "enabled" } else { "disabled" }
        );
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cluster_config() {
        let config = ClusterConfig::builder().build();
        assert_eq!(config.zookeeper(), &ZooKeeperConfig::use_defaults());
        assert_eq!(config.kafka(), &KafkaConfig::use_defaults());
        assert!(config.connect().is_none());
        assert!(!config.uses_connect());
        assert_eq!(config, ClusterConfig::default());
    }

    #[test]
    fn test_default_connect_config_enables_connect() {
        let config = ClusterConfig::builder()
            .configure_connect(ConnectConfig::use_defaults())
            .build();
        assert!(config.uses_connect());
    }

    #[test]
    fn test_connect_builder_enables_connect() {
        let config = ClusterConfig::builder()
            .configure_connect(ConnectConfig::builder().with_worker_id("w"))
            .build();
        assert_eq!(config.connect().unwrap().worker_id(), "w");
    }

    #[test]
    fn test_last_setter_wins() {
        let config = ClusterConfig::builder()
            .configure_zookeeper(ZooKeeperConfig::builder().with_port(2181))
            .configure_zookeeper(ZooKeeperConfig::builder().with_port(2182))
            .build();
        assert_eq!(config.zookeeper().port(), Some(2182));
    }
}
