pub mod producer;
pub mod serializer;

#[cfg(test)]
mod tests;

pub use producer::KafkaProducer;
pub use serializer::{EventSerializer, WireMessage};
