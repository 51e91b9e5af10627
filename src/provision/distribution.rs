//! Launch commands for an unpacked Apache Kafka distribution.

use crate::error::{HarnessError, HarnessResult};
use crate::provision::layout::NodeLayout;
use crate::topic::TopicConfig;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(windows)]
const SCRIPT_DIR: &str = "bin/windows";
#[cfg(windows)]
const SCRIPT_EXT: &str = "bat";
#[cfg(not(windows))]
const SCRIPT_DIR: &str = "bin";
#[cfg(not(windows))]
const SCRIPT_EXT: &str = "sh";

/// A program invocation, kept as data until it is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// An Apache Kafka installation, e.g. the directory `KAFKA_HOME` points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaDistribution {
    home: PathBuf,
}

impl KafkaDistribution {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Uses the installation `KAFKA_HOME` points to.
    pub fn from_env() -> HarnessResult<Self> {
        std::env::var_os("KAFKA_HOME")
            .map(Self::new)
            .ok_or_else(|| HarnessError::Configuration("KAFKA_HOME is not set".to_string()))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Checks that the broker start script exists.
    pub fn verify(&self) -> HarnessResult<()> {
        if self.script("kafka-server-start").is_file() {
            Ok(())
        } else {
            Err(HarnessError::DistributionNotFound(self.home.clone()))
        }
    }

    pub fn script(&self, name: &str) -> PathBuf {
        self.home
            .join(SCRIPT_DIR)
            .join(format!("{}.{}", name, SCRIPT_EXT))
    }

    pub fn zookeeper_command(&self, node: &NodeLayout) -> LaunchCommand {
        self.with_properties_file("zookeeper-server-start", node)
    }

    pub fn broker_command(&self, node: &NodeLayout) -> LaunchCommand {
        self.with_properties_file("kafka-server-start", node)
    }

    pub fn connect_command(&self, node: &NodeLayout) -> LaunchCommand {
        self.with_properties_file("connect-distributed", node)
    }

    /// Builds the `kafka-topics` invocation that creates `topic`.
    pub fn create_topic_command(
        &self,
        topic: &TopicConfig,
        bootstrap_servers: &str,
    ) -> LaunchCommand {
        let mut args = vec![
            "--bootstrap-server".to_string(),
            bootstrap_servers.to_string(),
            "--create".to_string(),
            "--topic".to_string(),
            topic.topic().to_string(),
            "--partitions".to_string(),
            topic.number_of_partitions().to_string(),
            "--replication-factor".to_string(),
            topic.number_of_replicas().to_string(),
        ];
        for (name, value) in topic.properties().iter() {
            args.push("--config".to_string());
            args.push(format!("{}={}", name, value));
        }
        LaunchCommand {
            program: self.script("kafka-topics"),
            args,
        }
    }

    fn with_properties_file(&self, script: &str, node: &NodeLayout) -> LaunchCommand {
        LaunchCommand {
            program: self.script(script),
            args: vec![node.properties_file.display().to_string()],
        }
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use crate::properties::Properties;
    use crate::provision::layout::NodeKind;

    fn node(file: &str) -> NodeLayout {
        NodeLayout {
            kind: NodeKind::Broker,
            name: "broker-0".to_string(),
            port: 9092,
            properties: Properties::new(),
            properties_file: PathBuf::from(file),
        }
    }

    #[test]
    fn test_broker_command() {
        let dist = KafkaDistribution::new("/opt/kafka");
        let command = dist.broker_command(&node("/tmp/run/broker-0.properties"));
        assert_eq!(
            command.program,
            PathBuf::from("/opt/kafka/bin/kafka-server-start.sh")
        );
        assert_eq!(command.args, vec!["/tmp/run/broker-0.properties"]);
        assert_eq!(
            command.to_string(),
            "/opt/kafka/bin/kafka-server-start.sh /tmp/run/broker-0.properties"
        );
    }

    #[test]
    fn test_create_topic_command() {
        let dist = KafkaDistribution::new("/opt/kafka");
        let topic = TopicConfig::with_name("orders")
            .with_number_of_partitions(3)
            .build();
        let command = dist.create_topic_command(&topic, "localhost:9092");

        assert_eq!(command.program, PathBuf::from("/opt/kafka/bin/kafka-topics.sh"));
        assert_eq!(
            command.args,
            vec![
                "--bootstrap-server",
                "localhost:9092",
                "--create",
                "--topic",
                "orders",
                "--partitions",
                "3",
                "--replication-factor",
                "1",
                "--config",
                "cleanup.policy=delete",
                "--config",
                "delete.retention.ms=86400000",
                "--config",
                "min.insync.replicas=1",
            ]
        );
    }

    #[test]
    fn test_verify_missing_distribution() {
        let dir = tempfile::tempdir().unwrap();
        let dist = KafkaDistribution::new(dir.path());
        assert!(matches!(
            dist.verify(),
            Err(HarnessError::DistributionNotFound(_))
        ));

        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/kafka-server-start.sh"), "#!/bin/sh\n").unwrap();
        assert!(dist.verify().is_ok());
    }
}
