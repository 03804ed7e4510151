// In crates/ledger/src/store.rs

use async_trait::async_trait;
use core_types::RecommendationRecord;

use crate::Result;
use crate::partition::PartitionKey;

/// The storage seam underneath the performance ledger.
///
/// A store keeps one ordered sequence of records per monthly partition. It does
/// no locking of its own across calls; the ledger serializes writers above it.
/// A partition that was never written reads as empty.
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// The name of the store implementation.
    fn name(&self) -> &'static str;

    /// Every record of a partition, in insertion order.
    async fn get_all(&self, partition: PartitionKey) -> Result<Vec<RecommendationRecord>>;

    /// Appends one record to the end of a partition.
    async fn append(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<()>;

    /// Replaces the record sharing `record.id`. Returns `false` when no such id exists.
    async fn update(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<bool>;

    /// Replaces several records of one partition. Returns how many ids were found.
    async fn update_many(
        &self,
        partition: PartitionKey,
        records: &[RecommendationRecord],
    ) -> Result<usize> {
        let mut found = 0;
        for record in records {
            if self.update(partition, record).await? {
                found += 1;
            }
        }
        Ok(found)
    }

    /// Keys of every partition that currently exists, oldest first.
    async fn partitions(&self) -> Result<Vec<PartitionKey>>;
}

/// Replaces records in `existing` by id; returns how many matched.
pub(crate) fn replace_by_id(
    existing: &mut [RecommendationRecord],
    updates: &[RecommendationRecord],
) -> usize {
    let mut found = 0;
    for update in updates {
        if let Some(slot) = existing.iter_mut().find(|r| r.id == update.id) {
            *slot = update.clone();
            found += 1;
        }
    }
    found
}
