use crate::config::CommitterConfig;
use crate::operation::{AddOperation, DeleteOperation, Operation};
use crate::Result;
use regex::Regex;

/// A serialized operation ready for dispatch: the message key and the
/// newline-terminated JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub key: String,
    pub payload: String,
}

/// Translates one operation into its wire message.
///
/// Serialization is deterministic and side-effect free: an add becomes a
/// JSON object with `id` first and one entry per retained metadata field, a
/// delete becomes a delete marker. Never fails for well-formed input.
pub struct EventSerializer {
    source_reference_field: Option<String>,
    keep_source_reference_field: bool,
    json_fields_pattern: Option<Regex>,
    dot_replacement: Option<String>,
}

impl EventSerializer {
    pub fn new(config: &CommitterConfig) -> Result<Self> {
        // Anchored so the field name must match the whole pattern.
        let json_fields_pattern = match &config.json_fields_pattern {
            Some(pattern) => Some(Regex::new(&format!("^(?:{pattern})$"))?),
            None => None,
        };

        Ok(Self {
            source_reference_field: config.source_reference_field.clone(),
            keep_source_reference_field: config.keep_source_reference_field,
            json_fields_pattern,
            dot_replacement: config.dot_replacement.clone(),
        })
    }

    pub fn serialize(&self, operation: &Operation) -> Result<WireMessage> {
        match operation {
            Operation::Add(add) => self.serialize_add(add),
            Operation::Delete(delete) => serialize_delete(delete),
        }
    }

    /// Effective document identity for an add: the first non-blank value of
    /// `source_reference_field` when configured, otherwise the operation's
    /// own reference. No other field is ever consulted.
    fn resolve_id<'a>(&self, add: &'a AddOperation) -> &'a str {
        if let Some(field) = &self.source_reference_field {
            if let Some(value) = add.metadata.first(field) {
                if !value.trim().is_empty() {
                    return value;
                }
            }
        }
        &add.reference
    }

    fn serialize_add(&self, add: &AddOperation) -> Result<WireMessage> {
        let id = self.resolve_id(add).to_string();

        let mut payload = String::from("{\"id\":");
        payload.push_str(&serde_json::to_string(&id)?);

        for (name, values) in add.metadata.iter() {
            let name = match &self.dot_replacement {
                Some(replacement) => name.replace('.', replacement),
                None => name.to_string(),
            };
            // The identity value already went out under "id"; drop its
            // source field unless configured to keep it.
            if !self.keep_source_reference_field
                && self.source_reference_field.as_deref() == Some(name.as_str())
            {
                continue;
            }

            payload.push(',');
            payload.push_str(&serde_json::to_string(&name)?);
            payload.push(':');
            match values {
                [value] => self.push_value(&mut payload, &name, value)?,
                values => {
                    payload.push('[');
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            payload.push(',');
                        }
                        self.push_value(&mut payload, &name, value)?;
                    }
                    payload.push(']');
                }
            }
        }

        payload.push_str("}\n");
        Ok(WireMessage { key: id, payload })
    }

    /// Values are escaped and quoted, except fields matching
    /// `json_fields_pattern`: those are spliced in raw, on the caller's
    /// promise that they hold well-formed JSON. Nothing checks that promise.
    fn push_value(&self, payload: &mut String, field: &str, value: &str) -> Result<()> {
        match &self.json_fields_pattern {
            Some(pattern) if pattern.is_match(field) => payload.push_str(value),
            _ => payload.push_str(&serde_json::to_string(value)?),
        }
        Ok(())
    }
}

/// Deletes always carry the raw operation reference, with no identity
/// remapping.
fn serialize_delete(delete: &DeleteOperation) -> Result<WireMessage> {
    let mut payload = String::from("{\"delete\":{\"id\":");
    payload.push_str(&serde_json::to_string(&delete.reference)?);
    payload.push_str("}}\n");

    Ok(WireMessage {
        key: delete.reference.clone(),
        payload,
    })
}
