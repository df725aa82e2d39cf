//! Generic response records.
//!
//! Every endpoint hands items back as a [`Record`]: a label derived from the
//! resource kind and identifier, plus the item's raw field map. Fields are
//! reached through explicit accessors rather than per-kind structs, since
//! the API's field sets vary by account configuration.

use std::fmt;

use serde_json::{Map, Value};

use crate::api::query::ItemType;
use crate::error::TimecampError;

/// One API response item: a label plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    label: String,
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(label: impl Into<String>, fields: Map<String, Value>) -> Self {
        Record {
            label: label.into(),
            fields,
        }
    }

    /// Human-readable kind plus identifier, e.g. `Task 42`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field)?.as_str()
    }

    /// Numeric accessor that also parses numeric strings, which the API
    /// uses interchangeably with numbers.
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        match self.get(field)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Identifier-style accessor: strings as-is, numbers stringified.
    pub fn get_id(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.label)?;
        for (field, value) in &self.fields {
            write!(f, "\n{}: {}", field, value)?;
        }
        Ok(())
    }
}

/// Flattens a top-level response body into labelled records.
///
/// Listing endpoints answer either with an array of objects or with an
/// object keyed by item id; both shapes normalize to the same `Vec`.
pub(crate) fn normalize(kind: ItemType, body: Value) -> Result<Vec<Record>, TimecampError> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                let Value::Object(fields) = item else {
                    return Err(TimecampError::UnexpectedResponse(format!(
                        "non-object item in {} response",
                        kind.as_str()
                    )));
                };
                let label = match kind.id_field().and_then(|field| identifier(&fields, field)) {
                    Some(id) => format!("{} {}", kind.label(), id),
                    None => kind.label().to_string(),
                };
                Ok(Record::new(label, fields))
            })
            .collect(),
        Value::Object(items) => items
            .into_iter()
            .map(|(id, item)| {
                let Value::Object(fields) = item else {
                    return Err(TimecampError::UnexpectedResponse(format!(
                        "non-object item in {} response",
                        kind.as_str()
                    )));
                };
                Ok(Record::new(format!("{} {}", kind.label(), id), fields))
            })
            .collect(),
        other => Err(TimecampError::UnexpectedResponse(format!(
            "expected object or array in {} response, got {}",
            kind.as_str(),
            json_kind(&other)
        ))),
    }
}

fn identifier(fields: &Map<String, Value>, field: &str) -> Option<String> {
    match fields.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
