//! Broker configuration shared by every broker of the embedded cluster.

use crate::properties::Properties;
use log::debug;
use serde::Serialize;

/// Broker defaults, applied only where the caller has not set a value.
const BROKER_DEFAULTS: &[(&str, &str)] = &[
    ("zookeeper.session.timeout.ms", "8000"),
    ("zookeeper.connection.timeout.ms", "10000"),
    ("num.partitions", "1"),
    ("default.replication.factor", "1"),
    ("min.insync.replicas", "1"),
    ("auto.create.topics.enable", "true"),
    ("message.max.bytes", "1000000"),
    ("controlled.shutdown.enable", "true"),
    ("offsets.topic.replication.factor", "1"),
    ("group.initial.rebalance.delay.ms", "0"),
    ("transaction.state.log.replication.factor", "1"),
    ("transaction.state.log.min.isr", "1"),
];

/// Configuration applied to all brokers of the embedded cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaConfig {
    number_of_brokers: u32,
    port: Option<u16>,
    broker_properties: Properties,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        KafkaConfigBuilder::default().build()
    }
}

impl KafkaConfig {
    pub fn builder() -> KafkaConfigBuilder {
        KafkaConfigBuilder::default()
    }

    pub fn use_defaults() -> Self {
        Self::default()
    }

    pub fn number_of_brokers(&self) -> u32 {
        self.number_of_brokers
    }

    pub fn uses_multiple_brokers(&self) -> bool {
        self.number_of_brokers > 1
    }

    /// Listener port of the first broker; broker `i` listens on `port + i`.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn broker_properties(&self) -> &Properties {
        &self.broker_properties
    }
}

#[derive(Debug, Clone)]
pub struct KafkaConfigBuilder {
    number_of_brokers: u32,
    port: Option<u16>,
    properties: Properties,
}

impl Default for KafkaConfigBuilder {
    fn default() -> Self {
        Self {
            number_of_brokers: 1,
            port: None,
            properties: Properties::new(),
        }
    }
}

impl KafkaConfigBuilder {
    pub fn with_number_of_brokers(mut self, number_of_brokers: u32) -> Self {
        self.number_of_brokers = number_of_brokers;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets a broker property such as `log.retention.hours`.
    pub fn with(mut self, property_name: impl Into<String>, value: impl ToString) -> Self {
        self.properties.set(property_name, value);
        self
    }

    pub fn with_all(mut self, properties: &Properties) -> Self {
        self.properties.extend_from(properties);
        self
    }

    pub fn build(mut self) -> KafkaConfig {
        for (name, value) in BROKER_DEFAULTS {
            self.properties.set_if_absent(name, value);
        }
        debug!(
            "Built Kafka config for {} broker(s) with {} properties",
            self.number_of_brokers,
            self.properties.len()
        );
        KafkaConfig {
            number_of_brokers: self.number_of_brokers,
            port: self.port,
            broker_properties: self.properties,
        }
    }
}

impl From<KafkaConfigBuilder> for KafkaConfig {
    fn from(builder: KafkaConfigBuilder) -> Self {
        builder.build()
    }
}
