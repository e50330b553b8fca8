use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use crate::errors::{AppError, Result};
use crate::config::Config;

pub mod local;
pub mod memory;

/// Key-value store for daily nutrient snapshots keyed by `(username, date)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Stores `document`, replacing any snapshot already stored for the key.
    async fn put(&self, username: &str, date: NaiveDate, document: &Value) -> Result<()>;

    async fn get(&self, username: &str, date: NaiveDate) -> Result<Option<Value>>;

    /// Dates with a stored snapshot, most recent first.
    async fn list(&self, username: &str) -> Result<Vec<NaiveDate>>;
}

pub fn create_snapshot_store(config: &Config) -> Result<Arc<dyn SnapshotStore>> {
    match config.snapshot_backend.as_str() {
        "local" => {
            let store = local::LocalSnapshotStore::new(&config.media_root)?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(memory::MemorySnapshotStore::new())),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "Unsupported snapshot backend: {}",
            other
        ))),
    }
}
