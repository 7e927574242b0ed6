//! The committer contract and its Kafka implementation.
//!
//! [`KafkaCommitter`] forwards add and delete operations to a Kafka topic as
//! newline-terminated JSON, keyed by document identity. The producer is
//! created lazily on the first commit and reused for the life of the
//! committer; there is no close, the client is dropped with the value.

use crate::config::Config;
use crate::kafka::{EventSerializer, KafkaProducer};
use crate::operation::Operation;
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// A sink for batches of document operations.
///
/// `save_config` and `load_config` exchange the committer's durable settings
/// with a host-managed TOML document, so a committer can be reconstructed
/// across runs.
#[async_trait]
pub trait Committer: Send + Sync {
    /// Forwards one ordered batch. Returning `Ok` means every operation was
    /// accepted for delivery, not that delivery completed.
    async fn commit(&self, batch: &[Operation]) -> Result<()>;

    fn save_config(&self, doc: &mut toml::Table);

    fn load_config(&mut self, doc: &toml::Table) -> Result<()>;
}

pub struct KafkaCommitter {
    config: Config,
    serializer: EventSerializer,
    producer: OnceCell<KafkaProducer>,
}

impl KafkaCommitter {
    pub fn new(config: Config) -> Result<Self> {
        let serializer = EventSerializer::new(&config.committer)?;

        Ok(Self {
            config,
            serializer,
            producer: OnceCell::new(),
        })
    }

    /// The producer, created on first use. Concurrent callers race to a
    /// single client; later calls get the winner.
    async fn ensure_producer(&self) -> Result<&KafkaProducer> {
        self.producer
            .get_or_try_init(|| async {
                info!(
                    brokers = %self.config.kafka.broker_list(),
                    topic = %self.config.kafka.topic,
                    "Creating Kafka producer"
                );
                KafkaProducer::new(&self.config.kafka)
            })
            .await
    }

    /// Drains the producer's local buffer. Call before dropping the
    /// committer when queued messages must survive process exit; a committer
    /// that never committed has nothing to drain.
    pub fn flush(&self, timeout: std::time::Duration) -> Result<()> {
        match self.producer.get() {
            Some(producer) => producer.flush(timeout),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Committer for KafkaCommitter {
    async fn commit(&self, batch: &[Operation]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let producer = self.ensure_producer().await?;

        for operation in batch {
            let message = self.serializer.serialize(operation)?;
            debug!(
                reference = operation.reference(),
                key = %message.key,
                "Queueing operation"
            );
            producer.send(&self.config.kafka.topic, &message.key, &message.payload)?;
        }

        info!(
            operations = batch.len(),
            topic = %self.config.kafka.topic,
            "Batch queued"
        );

        Ok(())
    }

    fn save_config(&self, doc: &mut toml::Table) {
        if !self.config.kafka.topic.trim().is_empty() {
            doc.insert(
                "topic_name".to_string(),
                toml::Value::String(self.config.kafka.topic.clone()),
            );
        }

        let broker_list = self.config.kafka.broker_list();
        if !broker_list.trim().is_empty() {
            doc.insert("broker_list".to_string(), toml::Value::String(broker_list));
        }
    }

    fn load_config(&mut self, doc: &toml::Table) -> Result<()> {
        if let Some(value) = doc.get("topic_name") {
            let topic = value
                .as_str()
                .ok_or_else(|| Error::InvalidConfig("topic_name must be a string".to_string()))?;
            self.config.kafka.topic = topic.to_string();
        }

        if let Some(value) = doc.get("broker_list") {
            let brokers = value
                .as_str()
                .ok_or_else(|| Error::InvalidConfig("broker_list must be a string".to_string()))?;
            self.config.kafka.brokers = brokers
                .split(',')
                .map(|broker| broker.trim().to_string())
                .filter(|broker| !broker.is_empty())
                .collect();
        }

        Ok(())
    }
}
