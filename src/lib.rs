//! # kafka-harness
//!
//! kafka-harness runs an [Apache Kafka][Kafka] cluster next to your tests.
//! It builds cluster and topic configurations, renders them into the
//! `.properties` files a Kafka distribution understands and starts ZooKeeper,
//! the brokers and an optional Kafka Connect worker as child processes.
//!
//! ## Installation
//!
//! To use kafka-harness, add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! kafka-harness = "0.1"
//! ```
//!
//! ## Features
//!
//! - Consuming builders for cluster, broker, ZooKeeper, Connect and topic configs
//! - Sensible single-node defaults injected only where nothing was set
//! - Key/value test records with ordered, charset-encoded headers
//! - Properties file rendering with free port allocation
//! - Process-backed cluster lifecycle with connector deployment
//! - Settings files in TOML, YAML or JSON with environment overrides
//! - CLI based console
//!
//! ## Basic Usage
//!
//! ```rust
//! use kafka_harness::prelude::*;
//!
//! let cluster = ClusterConfig::builder()
//!     .configure_kafka(KafkaConfig::builder().with_number_of_brokers(3))
//!     .build();
//! assert!(cluster.kafka().uses_multiple_brokers());
//! assert!(!cluster.uses_connect());
//!
//! let topic = TopicConfig::with_name("orders")
//!     .with_number_of_partitions(3)
//!     .with("cleanup.policy", "compact")
//!     .build();
//! assert_eq!(topic.properties().get("cleanup.policy"), Some("compact"));
//! assert_eq!(topic.properties().get("min.insync.replicas"), Some("1"));
//!
//! let mut record = KeyValue::new("order-1", "{\"amount\": 42}");
//! record.add_header("trace-id", "abc", Charset::Utf8).unwrap();
//! assert_eq!(record.headers().len(), 1);
//! ```
//!
//! Starting a cluster needs an unpacked Kafka distribution, usually found
//! through `KAFKA_HOME`:
//!
//! ```no_run
//! use kafka_harness::prelude::*;
//!
//! # async fn run() -> HarnessResult<()> {
//! let mut cluster = EmbeddedKafkaCluster::provision(
//!     ClusterConfig::default(),
//!     KafkaDistribution::from_env()?,
//! );
//! cluster.start().await?;
//! cluster.create_topic(&TopicConfig::with_name("orders").use_defaults()).await?;
//! println!("brokers: {}", cluster.bootstrap_servers()?);
//! cluster.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## CLI Features
//!
//! ```bash
//! kafka-harness render --out /tmp/cluster --brokers 3 --port 9092
//! kafka-harness topic --name orders --partitions 6 --config cleanup.policy=compact
//! kafka-harness start --config harness.toml
//! ```
//!
//! ### License
//!
//! MIT
//!
//! [Kafka]: https://kafka.apache.org/

pub mod cluster;
pub mod error;
pub mod properties;
pub mod provision;
pub mod record;
pub mod settings;
pub mod topic;

pub use cluster::{ClusterConfig, ClusterConfigBuilder};
pub use error::{HarnessError, HarnessResult};
pub use record::KeyValue;
pub use topic::{TopicConfig, TopicConfigBuilder};

pub mod prelude {
    pub use crate::cluster::{
        ClusterConfig, ClusterConfigBuilder, ConnectConfig, KafkaConfig, ZooKeeperConfig,
    };
    pub use crate::error::{HarnessError, HarnessResult};
    pub use crate::properties::Properties;
    pub use crate::provision::{ClusterLayout, EmbeddedKafkaCluster, KafkaDistribution};
    pub use crate::record::{Charset, EncodingError, Headers, KeyValue};
    pub use crate::topic::{TopicConfig, TopicConfigBuilder};
}
