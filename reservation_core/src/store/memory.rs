//! In-process reservation store for local development and tests

use crate::error::StoreError;
use crate::models::ReservationRow;
use crate::store::ReservationStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    next_id: u64,
    inserts: usize,
    next_failure: Option<StoreError>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next insert fail with `error`. The attempt is still counted.
    pub fn fail_next(&self, error: StoreError) {
        self.inner.lock().next_failure = Some(error);
    }

    /// Number of insert attempts, failed ones included.
    pub fn insert_count(&self) -> usize {
        self.inner.lock().inserts
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn insert_one(
        &self,
        table: &str,
        row: &ReservationRow,
    ) -> Result<Vec<Value>, StoreError> {
        let mut stored = serde_json::to_value(row)
            .map_err(|e| StoreError::Unexpected(format!("row is not serializable: {}", e)))?;

        let mut inner = self.inner.lock();
        inner.inserts += 1;

        if let Some(error) = inner.next_failure.take() {
            return Err(error);
        }

        inner.next_id += 1;
        stored["id"] = Value::from(inner.next_id);
        stored["created_at"] = Value::from(chrono::Utc::now().to_rfc3339());

        inner
            .tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());

        Ok(vec![stored])
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
