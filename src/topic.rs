//! Module for topic creation requests
//!
//! This module provides the [`TopicConfig`] struct, which describes a topic that
//! should be created on the embedded cluster, and the [`TopicConfigBuilder`]
//! used to assemble it.
//!
//! A topic config has a name, a partition count, a replica count and a set of
//! topic-level properties. Building a config always injects three properties
//! unless the caller already set them:
//!
//! | property              | default    |
//! |-----------------------|------------|
//! | `cleanup.policy`      | `delete`   |
//! | `delete.retention.ms` | `86400000` |
//! | `min.insync.replicas` | `1`        |
//!
//! # Example
//! ```
//! use kafka_harness::topic::TopicConfig;
//!
//! let config = TopicConfig::with_name("orders")
//!     .with_number_of_partitions(3)
//!     .build();
//!
//! assert_eq!(config.topic(), "orders");
//! assert_eq!(config.number_of_partitions(), 3);
//! assert_eq!(config.number_of_replicas(), 1);
//! assert_eq!(config.properties().get("cleanup.policy"), Some("delete"));
//! ```

use crate::properties::Properties;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

pub const CLEANUP_POLICY: &str = "cleanup.policy";
pub const DELETE_RETENTION_MS: &str = "delete.retention.ms";
pub const MIN_INSYNC_REPLICAS: &str = "min.insync.replicas";

const DEFAULT_CLEANUP_POLICY: &str = "delete";
const DEFAULT_DELETE_RETENTION_MS: &str = "86400000";
const DEFAULT_MIN_INSYNC_REPLICAS: &str = "1";

/// Represents a request to create a topic on the embedded cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicConfig {
    topic: String,
    number_of_partitions: u32,
    number_of_replicas: u32,
    properties: Properties,
}

impl TopicConfig {
    /// Returns a builder for the topic `topic` with default settings.
    ///
    /// # Arguments
    /// * `topic` - The name of the topic
    pub fn with_name(topic: impl Into<String>) -> TopicConfigBuilder {
        TopicConfigBuilder::new(topic.into())
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn number_of_partitions(&self) -> u32 {
        self.number_of_partitions
    }

    pub fn number_of_replicas(&self) -> u32 {
        self.number_of_replicas
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Flattens the topic properties into a plain map for the admin client.
    ///
    /// # Example
    /// ```
    /// use kafka_harness::topic::TopicConfig;
    ///
    /// let config = TopicConfig::with_name("audit").with("retention.ms", 1000).build();
    /// let map = config.properties_map();
    /// assert_eq!(map["retention.ms"], "1000");
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn properties_map(&self) -> HashMap<String, String> {
        self.properties.to_map()
    }
}

/// Accumulates the settings of a [`TopicConfig`].
#[derive(Debug, Clone)]
pub struct TopicConfigBuilder {
    topic: String,
    properties: Properties,
    number_of_partitions: u32,
    number_of_replicas: u32,
}

impl TopicConfigBuilder {
    fn new(topic: String) -> Self {
        Self {
            topic,
            properties: Properties::new(),
            number_of_partitions: 1,
            number_of_replicas: 1,
        }
    }

    pub fn with_number_of_partitions(mut self, number_of_partitions: u32) -> Self {
        self.number_of_partitions = number_of_partitions;
        self
    }

    pub fn with_number_of_replicas(mut self, number_of_replicas: u32) -> Self {
        self.number_of_replicas = number_of_replicas;
        self
    }

    /// Sets a single topic-level property.
    pub fn with(mut self, property_name: impl Into<String>, value: impl ToString) -> Self {
        self.properties.set(property_name, value);
        self
    }

    /// Merges `properties` into the builder; incoming values overwrite.
    pub fn with_all(mut self, properties: &Properties) -> Self {
        self.properties.extend_from(properties);
        self
    }

    /// Discards every customization and builds a default topic config.
    ///
    /// # Example
    /// ```
    /// use kafka_harness::topic::TopicConfig;
    ///
    /// let config = TopicConfig::with_name("orders")
    ///     .with_number_of_partitions(12)
    ///     .with("cleanup.policy", "compact")
    ///     .use_defaults();
    ///
    /// assert_eq!(config.number_of_partitions(), 1);
    /// assert_eq!(config.properties().get("cleanup.policy"), Some("delete"));
    /// ```
    pub fn use_defaults(mut self) -> TopicConfig {
        self.properties.clear();
        self.number_of_partitions = 1;
        self.number_of_replicas = 1;
        self.build()
    }

    pub fn build(mut self) -> TopicConfig {
        self.properties.set_if_absent(CLEANUP_POLICY, DEFAULT_CLEANUP_POLICY);
        self.properties.set_if_absent(DELETE_RETENTION_MS, DEFAULT_DELETE_RETENTION_MS);
        self.properties.set_if_absent(MIN_INSYNC_REPLICAS, DEFAULT_MIN_INSYNC_REPLICAS);

        debug!(
            "Built topic config for '{}': {} partition(s), {} replica(s), {} properties",
            self.topic,
            self.number_of_partitions,
            self.number_of_replicas,
            self.properties.len()
        );

        TopicConfig {
            topic: self.topic,
            number_of_partitions: self.number_of_partitions,
            number_of_replicas: self.number_of_replicas,
            properties: self.properties,
        }
    }
}
