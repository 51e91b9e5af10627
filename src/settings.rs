//! Declarative description of a cluster and its topics.
//!
//! Settings are read from a TOML, YAML or JSON file (chosen by extension) and
//! may be adjusted through environment variables afterwards:
//!
//! | Variable | Effect |
//! |---|---|
//! | `KAFKA_HOME` | Kafka installation used to start the cluster |
//! | `KAFKA_HARNESS_ZOOKEEPER_PORT` | ZooKeeper client port |
//! | `KAFKA_HARNESS_BROKER_PORT` | Listener port of the first broker |
//! | `KAFKA_HARNESS_BROKERS` | Number of brokers |
//! | `KAFKA_HARNESS_LOG_LEVEL` | Log level of the CLI |
//!
//! # Example
//! ```
//! use kafka_harness::settings::HarnessSettings;
//!
//! let settings: HarnessSettings = toml::from_str(r#"
//!     [cluster.kafka]
//!     brokers = 3
//!
//!     [[topics]]
//!     name = "orders"
//!     partitions = 6
//! "#).unwrap();
//!
//! assert_eq!(settings.cluster_config().kafka().number_of_brokers(), 3);
//! assert_eq!(settings.topic_configs()[0].number_of_partitions(), 6);
//! ```

use crate::cluster::{ClusterConfig, ConnectConfig, KafkaConfig, ZooKeeperConfig};
use crate::error::{HarnessError, HarnessResult};
use crate::properties::Properties;
use crate::provision::KafkaDistribution;
use crate::topic::TopicConfig;
use log::{LevelFilter, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A scalar property value as written in a settings file.
///
/// Floats keep their fractional part when rendered, so `1.0` stays `"1.0"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Integer(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{:?}", v),
            PropertyValue::Text(v) => f.write_str(v),
        }
    }
}

pub type PropertyTable = BTreeMap<String, PropertyValue>;

fn to_properties(table: &PropertyTable) -> Properties {
    table.iter().map(|(k, v)| (k.as_str(), v)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZooKeeperSettings {
    pub port: Option<u16>,
    pub properties: PropertyTable,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KafkaSettings {
    pub brokers: u32,
    pub port: Option<u16>,
    pub properties: PropertyTable,
}

impl Default for KafkaSettings {
    fn default() -> Self {
        Self {
            brokers: 1,
            port: None,
            properties: PropertyTable::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectSettings {
    pub worker_id: Option<String>,
    pub properties: PropertyTable,
    pub connectors: Vec<PropertyTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    pub zookeeper: ZooKeeperSettings,
    pub kafka: KafkaSettings,
    pub connect: Option<ConnectSettings>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicSettings {
    pub name: String,
    #[serde(default = "default_count")]
    pub partitions: u32,
    #[serde(default = "default_count")]
    pub replicas: u32,
    #[serde(default)]
    pub properties: PropertyTable,
}

fn default_count() -> u32 {
    1
}

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    pub kafka_home: Option<PathBuf>,
    pub startup_timeout_secs: u64,
    pub log_level: String,
    pub cluster: ClusterSettings,
    pub topics: Vec<TopicSettings>,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            kafka_home: None,
            startup_timeout_secs: 60,
            log_level: "info".to_string(),
            cluster: ClusterSettings::default(),
            topics: Vec::new(),
        }
    }
}

impl HarnessSettings {
    /// Applies `KAFKA_HOME` and `KAFKA_HARNESS_*` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// Values that do not parse are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(home) = lookup("KAFKA_HOME") {
            self.kafka_home = Some(PathBuf::from(home));
        }

        if let Some(port) = parse_override(&lookup, "KAFKA_HARNESS_ZOOKEEPER_PORT") {
            self.cluster.zookeeper.port = Some(port);
        }

        if let Some(port) = parse_override(&lookup, "KAFKA_HARNESS_BROKER_PORT") {
            self.cluster.kafka.port = Some(port);
        }

        if let Some(brokers) = parse_override(&lookup, "KAFKA_HARNESS_BROKERS") {
            self.cluster.kafka.brokers = brokers;
        }

        if let Some(level) = lookup("KAFKA_HARNESS_LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using info", self.log_level);
            LevelFilter::Info
        })
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        let zk = &self.cluster.zookeeper;
        let mut zookeeper = ZooKeeperConfig::builder();
        if let Some(port) = zk.port {
            zookeeper = zookeeper.with_port(port);
        }
        for (name, value) in &zk.properties {
            zookeeper = zookeeper.with(name.as_str(), value);
        }

        let k = &self.cluster.kafka;
        let mut kafka = KafkaConfig::builder()
            .with_number_of_brokers(k.brokers)
            .with_all(&to_properties(&k.properties));
        if let Some(port) = k.port {
            kafka = kafka.with_port(port);
        }

        let mut builder = ClusterConfig::builder()
            .configure_zookeeper(zookeeper)
            .configure_kafka(kafka);

        if let Some(c) = &self.cluster.connect {
            let mut connect = ConnectConfig::builder()
                .with_all(&to_properties(&c.properties))
                .deploy_connectors(c.connectors.iter().map(to_properties));
            if let Some(worker_id) = &c.worker_id {
                connect = connect.with_worker_id(worker_id.as_str());
            }
            builder = builder.configure_connect(connect);
        }

        builder.build()
    }

    pub fn topic_configs(&self) -> Vec<TopicConfig> {
        self.topics
            .iter()
            .map(|t| {
                TopicConfig::with_name(t.name.as_str())
                    .with_number_of_partitions(t.partitions)
                    .with_number_of_replicas(t.replicas)
                    .with_all(&to_properties(&t.properties))
                    .build()
            })
            .collect()
    }

    /// The Kafka installation to launch, falling back to `KAFKA_HOME`.
    pub fn distribution(&self) -> HarnessResult<KafkaDistribution> {
        match &self.kafka_home {
            Some(home) => Ok(KafkaDistribution::new(home)),
            None => KafkaDistribution::from_env(),
        }
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={}: not a valid number", key, raw);
            None
        }
    }
}

/// Load settings from file path by extension (toml/yaml/json)
pub fn load_settings_from_path(path: &Path) -> HarnessResult<HarnessSettings> {
    let content = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let settings = match ext.as_str() {
        "toml" => toml::from_str::<HarnessSettings>(&content)?,
        "yaml" | "yml" => serde_yaml::from_str::<HarnessSettings>(&content)?,
        "json" => serde_json::from_str::<HarnessSettings>(&content)?,
        _ => {
            return Err(HarnessError::Configuration(format!(
                "Unsupported settings extension: {}",
                ext
            )));
        }
    };
    Ok(settings)
}
