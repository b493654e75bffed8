use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ExpandError;

/// One variant or reference-matching block record.
///
/// Records arrive as schemaless JSON objects and must round-trip with every
/// field intact, so this is a transparent wrapper over the raw object with
/// typed accessors for the fields the expansion logic reads. Positions on
/// the wire are carried either as JSON numbers or as numeric strings; both
/// are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Record { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn reference_name(&self) -> Result<&str, ExpandError> {
        self.fields
            .get("reference_name")
            .and_then(Value::as_str)
            .ok_or(ExpandError::MissingField("reference_name"))
    }

    pub fn start(&self) -> Result<u64, ExpandError> {
        let value = self
            .fields
            .get("start")
            .ok_or(ExpandError::MissingField("start"))?;
        parse_position("start", value)
    }

    /// The half-open interval end. `END` is the deprecated wire alias and
    /// takes precedence; there is no `start + 1` fallback, absence is an
    /// error.
    pub fn end(&self) -> Result<u64, ExpandError> {
        if let Some(value) = self.fields.get("END") {
            return parse_position("END", value);
        }
        let value = self
            .fields
            .get("end")
            .ok_or(ExpandError::MissingField("end"))?;
        parse_position("end", value)
    }

    pub fn reference_bases(&self) -> Option<&str> {
        self.fields.get("reference_bases").and_then(Value::as_str)
    }

    pub fn alternate_bases(&self) -> &[Value] {
        self.fields
            .get("alternate_bases")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// A record is a variant iff it has at least one alternate allele.
    pub fn is_variant(&self) -> bool {
        !self.alternate_bases().is_empty()
    }

    /// A record is a SNP iff it is a variant and the reference allele and
    /// every alternate allele are a single base in {A, C, G, T}.
    pub fn is_snp(&self) -> bool {
        if !self.is_variant() {
            return false;
        }
        if !matches!(self.reference_bases(), Some("A" | "C" | "G" | "T")) {
            return false;
        }
        self.alternate_bases()
            .iter()
            .all(|alt| matches!(alt.as_str(), Some("A" | "C" | "G" | "T")))
    }

    pub fn calls(&self) -> &[Value] {
        self.fields
            .get("call")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn set_calls(&mut self, calls: Vec<Value>) {
        self.fields.insert("call".to_string(), Value::Array(calls));
    }

    /// The sample identifier of a reference block: the `call_set_name` of
    /// its first call entry.
    pub fn first_call_set_name(&self) -> Result<&str, ExpandError> {
        self.calls()
            .first()
            .and_then(call_set_name)
            .ok_or(ExpandError::MissingField("call_set_name"))
    }

    /// Sample identifiers of every call already present on this record.
    pub fn call_set_names(&self) -> Result<HashSet<&str>, ExpandError> {
        self.calls()
            .iter()
            .map(|call| call_set_name(call).ok_or(ExpandError::MissingField("call_set_name")))
            .collect()
    }

    /// Append calls to the record's `call` list. The list must already
    /// exist; a variant without one is malformed.
    pub fn extend_calls(&mut self, extra: Vec<Value>) -> Result<(), ExpandError> {
        let calls = self
            .fields
            .get_mut("call")
            .and_then(Value::as_array_mut)
            .ok_or(ExpandError::MissingField("call"))?;
        calls.extend(extra);
        Ok(())
    }
}

/// The `call_set_name` of one call entry.
pub fn call_set_name(call: &Value) -> Option<&str> {
    call.get("call_set_name").and_then(Value::as_str)
}

fn parse_position(field: &'static str, value: &Value) -> Result<u64, ExpandError> {
    match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| ExpandError::InvalidPosition {
            field,
            value: n.to_string(),
        }),
        Value::String(s) => s.parse().map_err(|_| ExpandError::InvalidPosition {
            field,
            value: s.clone(),
        }),
        other => Err(ExpandError::InvalidPosition {
            field,
            value: other.to_string(),
        }),
    }
}
