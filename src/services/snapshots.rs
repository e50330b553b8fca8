use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    errors::{AppError, Result},
    storage::SnapshotStore,
    utils::validate_username,
};

/// Daily nutrient snapshots submitted by clients as `{"<username>": <payload>}`.
#[derive(Clone)]
pub struct SnapshotService {
    store: Arc<dyn SnapshotStore>,
}

impl SnapshotService {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Parses a submission body and returns the username it is keyed by
    /// together with the whole document.
    pub fn parse_payload(body: &[u8]) -> Result<(String, Value)> {
        let document: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Malformed JSON: {}", e)))?;

        let object = document
            .as_object()
            .ok_or_else(|| AppError::Validation("Payload must be a JSON object".to_string()))?;

        let mut keys = object.keys();
        let username = match (keys.next(), keys.next()) {
            (Some(username), None) => username.clone(),
            (None, _) => {
                return Err(AppError::Validation(
                    "Payload must contain a username key".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "Payload must contain exactly one username key".to_string(),
                ))
            }
        };
        validate_username(&username)?;

        Ok((username, document))
    }

    pub fn parse_date(date: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", date)))
    }

    /// Stores the submission under `(username, today)`, replacing any snapshot
    /// from earlier the same day. Returns the username.
    pub async fn save(&self, body: &[u8], today: NaiveDate) -> Result<String> {
        let (username, document) = Self::parse_payload(body)?;

        self.store.put(&username, today, &document).await?;
        tracing::info!(username = %username, date = %today, "nutrient snapshot saved");

        Ok(username)
    }

    pub async fn get(&self, username: &str, date: NaiveDate) -> Result<Value> {
        self.store
            .get(username, date)
            .await?
            .ok_or_else(|| AppError::NotFound("Nutrient data not found for this date.".to_string()))
    }

    pub async fn list(&self, username: &str) -> Result<Vec<NaiveDate>> {
        self.store.list(username).await
    }
}
