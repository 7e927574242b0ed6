use kafka_committer::config::{CommitterConfig, Config, KafkaConfig};
use std::env;

/// Get test configuration from environment variables
pub fn get_test_config() -> Config {
    // Use TEST_ prefix for test environment variables
    let kafka = KafkaConfig {
        brokers: env::var("TEST_KAFKA_BROKERS")
            .unwrap_or_else(|_| "localhost:9092".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect(),
        topic: env::var("TEST_KAFKA_TOPIC")
            .unwrap_or_else(|_| format!("test_{}", std::process::id())),
        acks: "all".to_string(),
        compression: "none".to_string(), // No compression for tests
        linger_ms: 0,                    // Immediate sending for tests
        batch_size: 1,                   // Small batches for tests
        buffer_max_kbytes: 1024,         // 1MB for tests
        message_timeout_ms: 5000,
        send_retries: 0,
    };

    Config {
        kafka,
        committer: CommitterConfig::default(),
    }
}
