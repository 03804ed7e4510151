// In crates/ledger/src/json_store.rs

use async_trait::async_trait;
use core_types::RecommendationRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::partition::PartitionKey;
use crate::store::{PartitionStore, replace_by_id};
use crate::{Error, Result};

/// Stores each monthly partition as a pretty-printed JSON array in its own file.
///
/// Every mutation loads the whole file, changes it in memory and rewrites it.
/// The rewrite goes to a sibling `.tmp` file that is renamed over the original,
/// so readers see either the old array or the new one, never a truncated one.
///
/// Several processes sharing one `data_dir` are not coordinated; only the
/// in-process lock held by the ledger guards against lost updates.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    file_prefix: String,
}

impl JsonFileStore {
    /// Creates the store, making sure the data directory exists.
    pub async fn new(data_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await.map_err(|source| Error::Io {
            path: data_dir.clone(),
            source,
        })?;
        Ok(Self {
            data_dir,
            file_prefix: file_prefix.into(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `{data_dir}/{prefix}_{YYYY_MM}.json`
    pub fn partition_path(&self, partition: PartitionKey) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}.json", self.file_prefix, partition))
    }

    async fn load(&self, partition: PartitionKey) -> Result<Vec<RecommendationRecord>> {
        let path = self.partition_path(partition);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(Error::Io { path, source }),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| Error::CorruptPartition { path, source })
    }

    async fn save(&self, partition: PartitionKey, records: &[RecommendationRecord]) -> Result<()> {
        let path = self.partition_path(partition);
        let tmp_path = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(records)?;

        fs::write(&tmp_path, data).await.map_err(|source| Error::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| Error::Io { path, source })
    }
}

#[async_trait]
impl PartitionStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "JsonFileStore"
    }

    async fn get_all(&self, partition: PartitionKey) -> Result<Vec<RecommendationRecord>> {
        self.load(partition).await
    }

    async fn append(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<()> {
        let mut records = self.load(partition).await?;
        records.push(record.clone());
        self.save(partition, &records).await
    }

    async fn update(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<bool> {
        self.update_many(partition, std::slice::from_ref(record))
            .await
            .map(|found| found > 0)
    }

    async fn update_many(
        &self,
        partition: PartitionKey,
        records: &[RecommendationRecord],
    ) -> Result<usize> {
        let mut existing = self.load(partition).await?;
        let found = replace_by_id(&mut existing, records);
        if found > 0 {
            self.save(partition, &existing).await?;
        }
        Ok(found)
    }

    async fn partitions(&self) -> Result<Vec<PartitionKey>> {
        let mut entries = fs::read_dir(&self.data_dir).await.map_err(|source| Error::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let prefix = format!("{}_", self.file_prefix);
        let mut keys = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|source| Error::Io {
                path: self.data_dir.clone(),
                source,
            })?;
            let Some(entry) = entry else { break };

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else { continue };
            let key = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|stamp| stamp.parse::<PartitionKey>().ok());
            if let Some(key) = key {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_types::TradeCandidate;

    fn record(id: &str) -> RecommendationRecord {
        RecommendationRecord::pending(id.to_string(), Utc::now(), TradeCandidate::default())
    }

    #[tokio::test]
    async fn missing_partition_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "ai_performance").await.unwrap();
        let records = store.get_all(PartitionKey::new(2026, 1)).await.unwrap();
        assert!(records.is_empty());
        assert!(store.partitions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_writes_json_array_file_per_month() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "ai_performance").await.unwrap();
        let key = PartitionKey::new(2026, 10);

        store.append(key, &record("rec_a")).await.unwrap();
        store.append(key, &record("rec_b")).await.unwrap();

        let path = dir.path().join("ai_performance_2026_10.json");
        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let ids: Vec<&str> = raw.as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["rec_a", "rec_b"]);
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.partitions().await.unwrap(), vec![key]);
    }

    #[tokio::test]
    async fn update_replaces_by_id_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "p").await.unwrap();
        let key = PartitionKey::new(2026, 10);
        store.append(key, &record("rec_a")).await.unwrap();

        let mut changed = record("rec_a");
        changed.executed = true;
        assert!(store.update(key, &changed).await.unwrap());
        assert!(!store.update(key, &record("rec_missing")).await.unwrap());

        let records = store.get_all(key).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].executed);
    }

    #[tokio::test]
    async fn malformed_partition_is_reported_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "p").await.unwrap();
        let key = PartitionKey::new(2026, 10);
        let path = store.partition_path(key);
        std::fs::write(&path, "[{\"id\": ").unwrap();

        assert!(matches!(store.get_all(key).await, Err(Error::CorruptPartition { .. })));
        assert!(matches!(store.append(key, &record("rec_a")).await, Err(Error::CorruptPartition { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{\"id\": ");
    }

    #[tokio::test]
    async fn unrelated_files_are_not_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "p").await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("p_2026_13.json"), "[]").unwrap();
        std::fs::write(dir.path().join("p_2025_12.json"), "[]").unwrap();
        std::fs::write(dir.path().join("p_2026_02.json"), "").unwrap();

        let keys = store.partitions().await.unwrap();
        assert_eq!(keys, vec![PartitionKey::new(2025, 12), PartitionKey::new(2026, 2)]);
        assert!(store.get_all(PartitionKey::new(2026, 2)).await.unwrap().is_empty());
    }
}
