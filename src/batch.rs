//! Batch intake: reading an ordered operation batch from newline-delimited
//! JSON and applying the upstream field mappings before commit.

use crate::config::CommitterConfig;
use crate::operation::Operation;
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Reads one operation per line, skipping blank lines.
///
/// The batch keeps the input order; the committer dispatches it in that
/// order. A line that does not parse aborts the whole read with its
/// 1-based line number.
pub fn read_batch<R: BufRead>(reader: R) -> Result<Vec<Operation>> {
    let mut batch = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let operation: Operation =
            serde_json::from_str(&line).map_err(|e| Error::InvalidOperation {
                line: idx + 1,
                message: e.to_string(),
            })?;
        batch.push(operation);
    }

    debug!(operations = batch.len(), "Read operation batch");
    Ok(batch)
}

/// Populates add-operation content from `source_content_field`.
///
/// This is the mapping the collector framework applies before handing a
/// batch to its committer: when the field is configured and present, its
/// first value becomes the operation content and the field is dropped from
/// the metadata unless `keep_source_content_field` is set. Content never
/// reaches the wire, but dropping the field does change the emitted message.
pub fn map_source_content(batch: &mut [Operation], config: &CommitterConfig) {
    let field = match &config.source_content_field {
        Some(field) => field,
        None => return,
    };

    for operation in batch {
        if let Operation::Add(add) = operation {
            let content = add.metadata.first(field).map(str::to_string);
            if let Some(content) = content {
                add.content = content;
                if !config.keep_source_content_field {
                    add.metadata.remove(field);
                }
            }
        }
    }
}
