//! Error types and result handling for kafka-committer.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! # Example
//!
//! ```rust
//! use kafka_committer::{Error, Result};
//!
//! fn check_settings() -> Result<()> {
//!     // Simulating a rejected persisted setting
//!     Err(Error::InvalidConfig("topic_name must be a string".to_string()))
//! }
//!
//! match check_settings() {
//!     Ok(()) => println!("Settings ok"),
//!     Err(Error::InvalidConfig(msg)) => eprintln!("Bad setting: {}", msg),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for committer operations.
///
/// Failures are propagated unmodified to the caller: the committer performs
/// no retry, backoff, or partial-success bookkeeping of its own. Retrying a
/// failed batch is the responsibility of the calling framework.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A setting was present but unusable (e.g. a persisted key with the
    /// wrong type).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured `json_fields_pattern` is not a valid regular
    /// expression.
    #[error("Invalid json fields pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Kafka client or producer error, including enqueue failures such as
    /// an exhausted local send buffer.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// JSON encoding error while building a wire message.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error, typically while reading a batch file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line in a batch file did not parse as an operation.
    #[error("Invalid operation at line {line}: {message}")]
    InvalidOperation {
        /// 1-based line number within the batch input
        line: usize,
        /// Description of what was invalid
        message: String,
    },
}

/// A convenient Result type alias for committer operations.
///
/// This is equivalent to `std::result::Result<T, kafka_committer::Error>`.
///
/// # Example
///
/// ```rust
/// use kafka_committer::Result;
///
/// fn do_something() -> Result<String> {
///     Ok("Success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
