// libs/doctor-cell/src/services/store.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::ScheduleError;

/// Durable home of doctor availability rows, keyed by doctor and hospital.
/// Rows are opaque JSON; shape handling lives in the record codec.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn fetch(&self, doctor_id: &str, hospital_id: &str) -> Result<Option<Value>, ScheduleError>;

    async fn upsert(&self, doctor_id: &str, hospital_id: &str, record: Value) -> Result<(), ScheduleError>;
}

#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    records: RwLock<HashMap<(String, String), Value>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row as-is, e.g. a legacy record in an old format.
    pub async fn insert_raw(&self, doctor_id: &str, hospital_id: &str, record: Value) {
        self.records
            .write()
            .await
            .insert((doctor_id.to_string(), hospital_id.to_string()), record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn fetch(&self, doctor_id: &str, hospital_id: &str) -> Result<Option<Value>, ScheduleError> {
        let records = self.records.read().await;
        Ok(records
            .get(&(doctor_id.to_string(), hospital_id.to_string()))
            .cloned())
    }

    async fn upsert(&self, doctor_id: &str, hospital_id: &str, record: Value) -> Result<(), ScheduleError> {
        debug!("Storing schedule for doctor {} at hospital {}", doctor_id, hospital_id);
        self.insert_raw(doctor_id, hospital_id, record).await;
        Ok(())
    }
}
