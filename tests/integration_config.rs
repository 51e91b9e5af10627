/// Configuration builder integration tests
///
/// This test module tests the following functions:
/// - Topic configs and their injected defaults
/// - Cluster configs built from configs or builders
/// - Broker and Connect default injection
use kafka_harness::cluster::{ClusterConfig, ConnectConfig, KafkaConfig, ZooKeeperConfig};
use kafka_harness::properties::Properties;
use kafka_harness::topic::TopicConfig;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_topic_with_partitions() {
    init_logger();
    let config = TopicConfig::with_name("orders")
        .with_number_of_partitions(3)
        .build();

    assert_eq!(config.topic(), "orders");
    assert_eq!(config.number_of_partitions(), 3);
    assert_eq!(config.number_of_replicas(), 1);
    assert_eq!(config.properties().len(), 3);
    assert_eq!(config.properties().get("cleanup.policy"), Some("delete"));
    assert_eq!(
        config.properties().get("delete.retention.ms"),
        Some("86400000")
    );
    assert_eq!(config.properties().get("min.insync.replicas"), Some("1"));
}

#[test]
fn test_topic_overrides_are_preserved() {
    init_logger();
    let config = TopicConfig::with_name("compacted")
        .with("cleanup.policy", "compact")
        .with("min.insync.replicas", 2)
        .with("segment.ms", 60_000)
        .build();

    let map = config.properties_map();
    assert_eq!(map.len(), 4);
    assert_eq!(map["cleanup.policy"], "compact");
    assert_eq!(map["min.insync.replicas"], "2");
    assert_eq!(map["delete.retention.ms"], "86400000");
    assert_eq!(map["segment.ms"], "60000");
}

#[test]
fn test_topic_use_defaults_discards_settings() {
    let config = TopicConfig::with_name("t")
        .with_number_of_partitions(12)
        .with_number_of_replicas(3)
        .with("retention.ms", 1)
        .use_defaults();

    assert_eq!(config.number_of_partitions(), 1);
    assert_eq!(config.number_of_replicas(), 1);
    assert_eq!(config.properties().len(), 3);
    assert!(!config.properties().contains_key("retention.ms"));
}

#[test]
fn test_topic_bulk_properties() {
    let overrides: Properties = [("cleanup.policy", "compact"), ("max.message.bytes", "2048")]
        .into_iter()
        .collect();
    let config = TopicConfig::with_name("bulk")
        .with("cleanup.policy", "delete")
        .with_all(&overrides)
        .build();

    assert_eq!(config.properties().get("cleanup.policy"), Some("compact"));
    assert_eq!(config.properties().get("max.message.bytes"), Some("2048"));
}

#[test]
fn test_default_cluster_has_no_connect() {
    let config = ClusterConfig::builder().build();
    assert!(!config.uses_connect());
    assert_eq!(config.kafka().number_of_brokers(), 1);
    assert!(!config.kafka().uses_multiple_brokers());
    assert_eq!(config.zookeeper().port(), None);
}

#[test]
fn test_cluster_with_every_component() {
    init_logger();
    let connector: Properties = [
        ("name", "file-sink"),
        ("connector.class", "FileStreamSink"),
        ("topics", "orders"),
    ]
    .into_iter()
    .collect();

    let config = ClusterConfig::builder()
        .configure_zookeeper(ZooKeeperConfig::builder().with_port(2181).with("tickTime", 500))
        .configure_kafka(
            KafkaConfig::builder()
                .with_number_of_brokers(3)
                .with_port(9092)
                .with("num.partitions", 6),
        )
        .configure_connect(
            ConnectConfig::builder()
                .with_worker_id("worker-1")
                .deploy_connector(connector),
        )
        .build();

    assert!(config.uses_connect());
    assert_eq!(config.zookeeper().properties().get("tickTime"), Some("500"));

    let kafka = config.kafka();
    assert!(kafka.uses_multiple_brokers());
    assert_eq!(kafka.broker_properties().get("num.partitions"), Some("6"));
    assert_eq!(
        kafka.broker_properties().get("auto.create.topics.enable"),
        Some("true")
    );

    let connect = config.connect().unwrap();
    assert_eq!(connect.worker_id(), "worker-1");
    assert_eq!(connect.connectors()[0].get("topics"), Some("orders"));
    assert_eq!(connect.properties().get("group.id"), Some("kafka-connect"));
}

#[test]
fn test_builders_are_reusable_snapshots() {
    let builder = KafkaConfig::builder().with_number_of_brokers(2);
    let first = builder.clone().build();
    let second = builder.with("num.partitions", 4).build();

    assert_eq!(first.broker_properties().get("num.partitions"), Some("1"));
    assert_eq!(second.broker_properties().get("num.partitions"), Some("4"));
}
