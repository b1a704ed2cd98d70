//! Storage blob: the canonical persisted document, built from a serialized payload.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::ItemKind;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Blob {
    pub kind: ItemKind,
    pub id: String,
    /// Last update of the underlying record; construction time when the record has none.
    pub timestamp: DateTime<Utc>,
    pub data: Map<String, Value>,
}

impl Blob {
    /// Build a blob from JSON bytes. Fails unless the payload decodes into a JSON object.
    pub fn from_payload(kind: ItemKind, id: impl Into<String>, payload: &[u8]) -> Result<Blob> {
        let id = id.into();
        let value: Value = serde_json::from_slice(payload)
            .with_context(|| format!("decode {} {} payload", kind, id))?;
        let Value::Object(data) = value else {
            bail!("{} {} payload is not a JSON object", kind, id);
        };
        let timestamp = data
            .get("updated_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        Ok(Blob {
            kind,
            id,
            timestamp,
            data,
        })
    }

    /// Document body as written to the store.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(&self.data).context("encode blob data")
    }
}
