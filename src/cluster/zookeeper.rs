use crate::properties::Properties;
use serde::Serialize;

/// Configuration of the ZooKeeper instance backing the embedded cluster.
///
/// Without an explicit port a free ephemeral port is chosen when the cluster
/// is provisioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZooKeeperConfig {
    port: Option<u16>,
    properties: Properties,
}

impl ZooKeeperConfig {
    pub fn builder() -> ZooKeeperConfigBuilder {
        ZooKeeperConfigBuilder::default()
    }

    pub fn use_defaults() -> Self {
        Self::default()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZooKeeperConfigBuilder {
    port: Option<u16>,
    properties: Properties,
}

impl ZooKeeperConfigBuilder {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets a ZooKeeper server property such as `tickTime`.
    pub fn with(mut self, property_name: impl Into<String>, value: impl ToString) -> Self {
        self.properties.set(property_name, value);
        self
    }

    pub fn build(self) -> ZooKeeperConfig {
        ZooKeeperConfig {
            port: self.port,
            properties: self.properties,
        }
    }
}

impl From<ZooKeeperConfigBuilder> for ZooKeeperConfig {
    fn from(builder: ZooKeeperConfigBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_ephemeral_port() {
        let config = ZooKeeperConfig::use_defaults();
        assert!(config.port().is_none());
        assert!(config.properties().is_empty());
    }

    #[test]
    fn test_builder() {
        let config = ZooKeeperConfig::builder()
            .with_port(2181)
            .with("tickTime", 500)
            .build();
        assert_eq!(config.port(), Some(2181));
        assert_eq!(config.properties().get("tickTime"), Some("500"));
    }
}
