//! Manager collaborator: the data-access seam the core delegates all I/O to.
//!
//! Managers return plain property maps; the core never interprets their
//! failures beyond propagating them. An in-memory implementation is shipped
//! for demos and tests.

use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// A materialized property snapshot: field name -> value. Iteration order is
/// insertion order (serde_json `preserve_order`).
pub type Properties = serde_json::Map<String, Value>;

/// External data-access collaborator for a resource class.
#[async_trait]
pub trait Manager: Send + Sync {
    /// Create a record from the given values and return its properties.
    async fn create(&self, values: Properties) -> Result<Properties, ApiError>;

    /// Fetch one record by lookup keys, or `None` if absent.
    async fn retrieve(&self, lookup_keys: Properties) -> Result<Option<Properties>, ApiError>;

    /// Fetch records matching the filters, plus optional pagination metadata.
    async fn retrieve_list(
        &self,
        filters: Properties,
    ) -> Result<(Vec<Properties>, Option<Value>), ApiError>;
}

/// Thread-safe in-memory manager keyed by the configured primary keys.
/// The leaf key is auto-assigned from a counter when absent on create.
pub struct InMemoryManager {
    pks: Vec<String>,
    store: RwLock<HashMap<String, Properties>>,
    next_id: AtomicU64,
}

impl InMemoryManager {
    pub fn new<I, S>(pks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InMemoryManager {
            pks: pks.into_iter().map(Into::into).collect(),
            store: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn key_for(&self, properties: &Properties) -> Result<String, ApiError> {
        let mut segments = Vec::with_capacity(self.pks.len());
        for pk in &self.pks {
            let value = properties
                .get(pk)
                .ok_or_else(|| ApiError::MissingProperty { field: pk.clone() })?;
            segments.push(key_segment(value));
        }
        Ok(segments.join("::"))
    }
}

fn key_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches_filters(record: &Properties, filters: &Properties) -> bool {
    filters.iter().all(|(field, expected)| {
        record
            .get(field)
            .map(|actual| actual == expected || key_segment(actual) == key_segment(expected))
            .unwrap_or(false)
    })
}

#[async_trait]
impl Manager for InMemoryManager {
    async fn create(&self, mut values: Properties) -> Result<Properties, ApiError> {
        if let Some(leaf) = self.pks.last() {
            if !values.contains_key(leaf) {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                values.insert(leaf.clone(), Value::String(id.to_string()));
            }
        }
        let key = self.key_for(&values)?;
        let mut store = self.store.write().unwrap();
        store.insert(key, values.clone());
        Ok(values)
    }

    async fn retrieve(&self, lookup_keys: Properties) -> Result<Option<Properties>, ApiError> {
        let key = self.key_for(&lookup_keys)?;
        let store = self.store.read().unwrap();
        Ok(store.get(&key).cloned())
    }

    async fn retrieve_list(
        &self,
        filters: Properties,
    ) -> Result<(Vec<Properties>, Option<Value>), ApiError> {
        let store = self.store.read().unwrap();
        let records: Vec<Properties> = store
            .values()
            .filter(|record| matches_filters(record, &filters))
            .cloned()
            .collect();
        let meta = serde_json::json!({ "count": records.len() });
        Ok((records, Some(meta)))
    }
}
