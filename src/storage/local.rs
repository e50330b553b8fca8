use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use crate::{
    errors::{AppError, Result},
    storage::SnapshotStore,
    utils::validate_username,
};

pub const SNAPSHOT_DIR: &str = "user_nutrients";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Snapshots on disk at `{media_root}/user_nutrients/{username}/{YYYY-MM-DD}.json`.
pub struct LocalSnapshotStore {
    base_path: PathBuf,
}

impl LocalSnapshotStore {
    pub fn new<P: AsRef<Path>>(media_root: P) -> Result<Self> {
        let base_path = media_root.as_ref().join(SNAPSHOT_DIR);

        std::fs::create_dir_all(&base_path)
            .map_err(|e| AppError::Storage(format!("Failed to create storage directory: {}", e)))?;

        Ok(Self { base_path })
    }

    fn user_dir(&self, username: &str) -> Result<PathBuf> {
        validate_username(username)?;
        Ok(self.base_path.join(username))
    }

    fn snapshot_path(&self, username: &str, date: NaiveDate) -> Result<PathBuf> {
        Ok(self
            .user_dir(username)?
            .join(format!("{}.json", date.format(DATE_FORMAT))))
    }
}

/// Four-space indented JSON, non-ASCII written as UTF-8.
fn render_document(document: &Value) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Writes to a temp file next to `path` and renames it into place, so readers
/// see either the old or the new document.
fn write_atomically(dir: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn parse_snapshot_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".json")?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn put(&self, username: &str, date: NaiveDate, document: &Value) -> Result<()> {
        let dir = self.user_dir(username)?;
        let path = self.snapshot_path(username, date)?;
        let contents = render_document(document)?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &contents))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Snapshot writer panicked: {}", e)))?
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    async fn get(&self, username: &str, date: NaiveDate) -> Result<Option<Value>> {
        let path = self.snapshot_path(username, date)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let document = serde_json::from_slice(&bytes)?;
        Ok(Some(document))
    }

    async fn list(&self, username: &str) -> Result<Vec<NaiveDate>> {
        let dir = self.user_dir(username)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut dates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to list {}: {}", dir.display(), e)))?
        {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(date) = entry.file_name().to_str().and_then(parse_snapshot_file_name) {
                dates.push(date);
            }
        }

        dates.sort_unstable_by(|a, b| b.cmp(a));
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let temp_dir = tempdir().unwrap();
        let store = LocalSnapshotStore::new(temp_dir.path()).unwrap();
        let document = json!({"alice": {"Calories": 1850.5, "note": "café"}});

        store.put("alice", date("2024-03-01"), &document).await.unwrap();

        let stored = store.get("alice", date("2024-03-01")).await.unwrap();
        assert_eq!(stored, Some(document));

        let path = temp_dir.path().join("user_nutrients/alice/2024-03-01.json");
        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("café"));
        assert!(raw.contains("\n    \"alice\""));
    }

    #[tokio::test]
    async fn test_submitted_key_order_is_kept_on_disk() {
        let temp_dir = tempdir().unwrap();
        let store = LocalSnapshotStore::new(temp_dir.path()).unwrap();
        let document: Value =
            serde_json::from_str(r#"{"alice": {"Protein": 120, "Carbs": 200, "Calories": 1850}}"#)
                .unwrap();

        store.put("alice", date("2024-03-01"), &document).await.unwrap();

        let raw = std::fs::read_to_string(
            temp_dir.path().join("user_nutrients/alice/2024-03-01.json"),
        )
        .unwrap();
        let protein = raw.find("\"Protein\"").unwrap();
        let carbs = raw.find("\"Carbs\"").unwrap();
        let calories = raw.find("\"Calories\"").unwrap();
        assert!(protein < carbs && carbs < calories, "{}", raw);
    }

    #[tokio::test]
    async fn test_put_overwrites_same_day() {
        let temp_dir = tempdir().unwrap();
        let store = LocalSnapshotStore::new(temp_dir.path()).unwrap();
        let day = date("2024-03-01");

        store.put("alice", day, &json!({"alice": {"v": 1}})).await.unwrap();
        store.put("alice", day, &json!({"alice": {"v": 2}})).await.unwrap();

        assert_eq!(store.get("alice", day).await.unwrap(), Some(json!({"alice": {"v": 2}})));
        assert_eq!(store.list("alice").await.unwrap(), vec![day]);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let temp_dir = tempdir().unwrap();
        let store = LocalSnapshotStore::new(temp_dir.path()).unwrap();

        assert_eq!(store.get("alice", date("2024-03-01")).await.unwrap(), None);
        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_descending_and_skips_foreign_files() {
        let temp_dir = tempdir().unwrap();
        let store = LocalSnapshotStore::new(temp_dir.path()).unwrap();

        for day in ["2024-01-15", "2024-03-01", "2023-12-31"] {
            store.put("alice", date(day), &json!({"alice": {}})).await.unwrap();
        }
        let user_dir = temp_dir.path().join("user_nutrients/alice");
        std::fs::write(user_dir.join("notes.txt"), "x").unwrap();
        std::fs::write(user_dir.join("not-a-date.json"), "{}").unwrap();

        let dates = store.list("alice").await.unwrap();
        assert_eq!(dates, vec![date("2024-03-01"), date("2024-01-15"), date("2023-12-31")]);
    }

    #[tokio::test]
    async fn test_unsafe_usernames_are_rejected() {
        let temp_dir = tempdir().unwrap();
        let store = LocalSnapshotStore::new(temp_dir.path()).unwrap();

        let result = store.put("../escape", date("2024-03-01"), &json!({})).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
