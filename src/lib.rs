pub mod batch;
pub mod committer;
pub mod config;
pub mod error;
pub mod operation;

pub mod kafka;

pub use committer::{Committer, KafkaCommitter};
pub use config::Config;
pub use error::{Error, Result};
pub use operation::{AddOperation, DeleteOperation, Metadata, Operation};
