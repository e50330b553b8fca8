use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::{errors::Result, storage::SnapshotStore};

/// Process-local snapshot store, mostly useful for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<String, BTreeMap<NaiveDate, Value>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn put(&self, username: &str, date: NaiveDate, document: &Value) -> Result<()> {
        self.snapshots
            .write()
            .await
            .entry(username.to_string())
            .or_default()
            .insert(date, document.clone());
        Ok(())
    }

    async fn get(&self, username: &str, date: NaiveDate) -> Result<Option<Value>> {
        Ok(self
            .snapshots
            .read()
            .await
            .get(username)
            .and_then(|days| days.get(&date))
            .cloned())
    }

    async fn list(&self, username: &str) -> Result<Vec<NaiveDate>> {
        Ok(self
            .snapshots
            .read()
            .await
            .get(username)
            .map(|days| days.keys().rev().copied().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_operations() {
        let store = MemorySnapshotStore::new();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        store.put("alice", jan, &json!({"alice": 1})).await.unwrap();
        store.put("alice", feb, &json!({"alice": 2})).await.unwrap();
        store.put("alice", feb, &json!({"alice": 3})).await.unwrap();

        assert_eq!(store.get("alice", feb).await.unwrap(), Some(json!({"alice": 3})));
        assert_eq!(store.list("alice").await.unwrap(), vec![feb, jan]);
        assert!(store.list("bob").await.unwrap().is_empty());
        assert_eq!(store.get("bob", jan).await.unwrap(), None);
    }
}
