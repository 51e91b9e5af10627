//! Kafka Connect worker configuration.
//!
//! A [`ConnectConfig`] describes a distributed Connect worker that runs next to
//! the embedded brokers, together with the connectors deployed to it once it
//! is up. Each connector is a plain property map that must at least contain
//! `name` and `connector.class`.

use crate::properties::Properties;
use log::debug;
use serde::Serialize;
use uuid::Uuid;

const STRING_CONVERTER: &str = "org.apache.kafka.connect.storage.StringConverter";

const WORKER_DEFAULTS: &[(&str, &str)] = &[
    ("key.converter", STRING_CONVERTER),
    ("value.converter", STRING_CONVERTER),
    ("group.id", "kafka-connect"),
    ("offset.storage.topic", "embedded-connect-offsets"),
    ("offset.storage.replication.factor", "1"),
    ("config.storage.topic", "embedded-connect-config"),
    ("config.storage.replication.factor", "1"),
    ("status.storage.topic", "embedded-connect-status"),
    ("status.storage.replication.factor", "1"),
    ("offset.flush.interval.ms", "10000"),
];

/// Configuration of the Kafka Connect worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectConfig {
    worker_id: String,
    properties: Properties,
    connectors: Vec<Properties>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        ConnectConfigBuilder::default().build()
    }
}

impl ConnectConfig {
    pub fn builder() -> ConnectConfigBuilder {
        ConnectConfigBuilder::default()
    }

    pub fn use_defaults() -> Self {
        Self::default()
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn connectors(&self) -> &[Properties] {
        &self.connectors
    }
}

#[derive(Debug, Clone)]
pub struct ConnectConfigBuilder {
    worker_id: String,
    properties: Properties,
    connectors: Vec<Properties>,
}

impl Default for ConnectConfigBuilder {
    fn default() -> Self {
        Self {
            worker_id: format!("worker-{}", Uuid::new_v4()),
            properties: Properties::new(),
            connectors: Vec::new(),
        }
    }
}

impl ConnectConfigBuilder {
    pub fn with_worker_id(mut self, worker_id: impl Into<String>) -> Self {
        self.worker_id = worker_id.into();
        self
    }

    /// Sets a worker property.
    pub fn with(mut self, property_name: impl Into<String>, value: impl ToString) -> Self {
        self.properties.set(property_name, value);
        self
    }

    pub fn with_all(mut self, properties: &Properties) -> Self {
        self.properties.extend_from(properties);
        self
    }

    /// Queues a connector to be deployed once the worker is running.
    pub fn deploy_connector(mut self, connector: Properties) -> Self {
        self.connectors.push(connector);
        self
    }

    pub fn deploy_connectors(mut self, connectors: impl IntoIterator<Item = Properties>) -> Self {
        self.connectors.extend(connectors);
        self
    }

    pub fn build(mut self) -> ConnectConfig {
        for (name, value) in WORKER_DEFAULTS {
            self.properties.set_if_absent(name, value);
        }
        debug!(
            "Built Connect config for worker '{}' with {} connector(s)",
            self.worker_id,
            self.connectors.len()
        );
        ConnectConfig {
            worker_id: self.worker_id,
            properties: self.properties,
            connectors: self.connectors,
        }
    }
}

impl From<ConnectConfigBuilder> for ConnectConfig {
    fn from(builder: ConnectConfigBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_worker() {
        let config = ConnectConfig::use_defaults();
        assert!(config.worker_id().starts_with("worker-"));
        assert!(config.connectors().is_empty());
        assert_eq!(config.properties().get("group.id"), Some("kafka-connect"));
        assert_eq!(
            config.properties().get("value.converter"),
            Some(STRING_CONVERTER)
        );
    }

    #[test]
    fn test_worker_ids_are_unique() {
        assert_ne!(
            ConnectConfig::use_defaults().worker_id(),
            ConnectConfig::use_defaults().worker_id()
        );
    }

    #[test]
    fn test_connectors_and_overrides() {
        let source: Properties = [
            ("name", "file-source"),
            ("connector.class", "FileStreamSource"),
        ]
        .into_iter()
        .collect();
        let sink: Properties = [("name", "file-sink"), ("connector.class", "FileStreamSink")]
            .into_iter()
            .collect();

        let config = ConnectConfig::builder()
            .with_worker_id("worker-1")
            .with("group.id", "my-group")
            .deploy_connector(source)
            .deploy_connectors(vec![sink])
            .build();

        assert_eq!(config.worker_id(), "worker-1");
        assert_eq!(config.properties().get("group.id"), Some("my-group"));
        assert_eq!(config.connectors().len(), 2);
        assert_eq!(config.connectors()[1].get("name"), Some("file-sink"));
    }
}
