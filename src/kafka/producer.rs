use crate::{config::KafkaConfig, Error, Result};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;

pub struct KafkaProducer {
    producer: FutureProducer,
}

impl KafkaProducer {
    /// Builds the client bound to the configured broker list. Creation only
    /// validates the property set; broker reachability is not checked.
    pub fn new(config: &KafkaConfig) -> Result<Self> {
        let producer = ClientConfig::new()
            .set("bootstrap.servers", config.broker_list())
            .set("acks", &config.acks)
            .set("compression.type", &config.compression)
            .set("linger.ms", config.linger_ms.to_string())
            .set("batch.size", config.batch_size.to_string())
            .set(
                "queue.buffering.max.kbytes",
                config.buffer_max_kbytes.to_string(),
            )
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .set("retries", config.send_retries.to_string())
            .create()
            .map_err(Error::Kafka)?;

        Ok(Self { producer })
    }

    /// Hands the record to the client's local buffer and returns. Delivery
    /// happens in the background; only enqueue failures (typically buffer
    /// exhaustion) surface here.
    pub fn send(&self, topic: &str, key: &str, payload: &str) -> Result<()> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        self.producer
            .send_result(record)
            .map_err(|(e, _)| Error::Kafka(e))?;

        Ok(())
    }

    /// Blocks until the local buffer drains or the timeout passes. Used on
    /// shutdown so batched messages are not dropped with the process.
    pub fn flush(&self, timeout: std::time::Duration) -> Result<()> {
        self.producer.flush(timeout).map_err(Error::Kafka)?;
        Ok(())
    }
}
