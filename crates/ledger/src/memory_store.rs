// In crates/ledger/src/memory_store.rs

use async_trait::async_trait;
use core_types::RecommendationRecord;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::Result;
use crate::partition::PartitionKey;
use crate::store::{PartitionStore, replace_by_id};

/// A volatile store that keeps partitions in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: Mutex<BTreeMap<PartitionKey, Vec<RecommendationRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PartitionStore for MemoryStore {
    fn name(&self) -> &'static str {
        "MemoryStore"
    }

    async fn get_all(&self, partition: PartitionKey) -> Result<Vec<RecommendationRecord>> {
        let partitions = self.partitions.lock().await;
        Ok(partitions.get(&partition).cloned().unwrap_or_default())
    }

    async fn append(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<()> {
        let mut partitions = self.partitions.lock().await;
        partitions.entry(partition).or_default().push(record.clone());
        Ok(())
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
        let mut partitions = self.partitions.lock().await;
        Ok(partitions
            .get_mut(&partition)
            .map_or(0, |existing| replace_by_id(existing, records)))
    }

    async fn partitions(&self) -> Result<Vec<PartitionKey>> {
        Ok(self.partitions.lock().await.keys().copied().collect())
    }
}
