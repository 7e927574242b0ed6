use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub committer: CommitterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KafkaConfig {
    // Blank brokers/topic are accepted here and fail at first send; the
    // committer does no defensive validation of its own.
    #[serde(default)]
    pub brokers: Vec<String>,
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_acks")]
    pub acks: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_buffer_max_kbytes")]
    pub buffer_max_kbytes: u32,
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u32,
    #[serde(default)]
    pub send_retries: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommitterConfig {
    #[serde(default)]
    pub source_reference_field: Option<String>,
    #[serde(default)]
    pub keep_source_reference_field: bool,
    #[serde(default)]
    pub source_content_field: Option<String>,
    #[serde(default)]
    pub keep_source_content_field: bool,
    #[serde(default)]
    pub json_fields_pattern: Option<String>,
    #[serde(default)]
    pub dot_replacement: Option<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("KAFKA_COMMITTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }
}

impl KafkaConfig {
    /// Brokers joined into the comma-separated list the client expects.
    pub fn broker_list(&self) -> String {
        self.brokers.join(",")
    }
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: Vec::new(),
            topic: String::new(),
            acks: default_acks(),
            compression: default_compression(),
            linger_ms: default_linger_ms(),
            batch_size: default_batch_size(),
            buffer_max_kbytes: default_buffer_max_kbytes(),
            message_timeout_ms: default_message_timeout_ms(),
            send_retries: 0,
        }
    }
}

fn default_acks() -> String {
    "all".to_string()
}

fn default_compression() -> String {
    "none".to_string()
}

fn default_linger_ms() -> u32 {
    250
}

fn default_batch_size() -> usize {
    16384
}

fn default_buffer_max_kbytes() -> u32 {
    1024 // 1MB
}

fn default_message_timeout_ms() -> u32 {
    30_000
}
