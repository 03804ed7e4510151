// In crates/ledger/src/tracker.rs

use analytics::{AnalyticsEngine, PerformanceMetrics};
use chrono::{DateTime, Duration, Utc};
use core_types::{RecommendationRecord, RecordStatus, TradeCandidate};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::partition::PartitionKey;
use crate::store::PartitionStore;
use crate::{Error, Result};

/// Process-wide sequence appended to every id so two records created within
/// the same nanosecond still differ.
static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// The durable record of every accepted recommendation and its outcome.
///
/// Cloning is cheap and every clone shares the same store and lock. Writers
/// hold the write guard across the whole load, mutate and persist sequence, so
/// concurrent updates to one partition never lose each other's changes.
#[derive(Clone)]
pub struct PerformanceLedger {
    inner: Arc<Inner>,
}

struct Inner {
    store: Box<dyn PartitionStore>,
    lock: RwLock<()>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PerformanceLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceLedger")
            .field("store", &self.inner.store.name())
            .field("clock", &self.inner.clock)
            .finish()
    }
}

impl PerformanceLedger {
    pub fn new(store: impl PartitionStore + 'static) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: impl PartitionStore + 'static, clock: Arc<dyn Clock>) -> Self {
        tracing::info!(store = store.name(), "Performance ledger initialized.");
        Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                lock: RwLock::new(()),
                clock,
            }),
        }
    }

    /// The ledger's notion of the current instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    // --- Writers ---

    /// Persists a new pending record for `candidate` in the current month.
    pub async fn record_recommendation(&self, candidate: TradeCandidate) -> Result<RecommendationRecord> {
        let _guard = self.inner.lock.write().await;

        let now = self.now();
        let record = RecommendationRecord::pending(next_record_id(now), now, candidate);
        self.inner.store.append(PartitionKey::of(now), &record).await?;

        tracing::info!(
            id = %record.id,
            ticker = %record.candidate.ticker,
            strategy = %record.candidate.strategy,
            "Recommendation recorded."
        );
        Ok(record)
    }

    /// Marks a pending record as executed.
    ///
    /// Passing `executed = false` for a record that is still pending changes
    /// nothing. Un-executing a record that already moved on is rejected.
    pub async fn update_execution(&self, id: &str, executed: bool) -> Result<RecommendationRecord> {
        let _guard = self.inner.lock.write().await;

        let (partition, mut record) = self.find(id).await?;
        let target = if executed { RecordStatus::Executed } else { RecordStatus::Pending };
        if record.status.is_terminal() {
            return Err(transition(&record, record.status, target));
        }
        match (record.status, executed) {
            (RecordStatus::Pending, true) => {
                record.executed = true;
                record.execution_time = Some(self.now());
                record.status = RecordStatus::Executed;
            }
            (RecordStatus::Pending, false) => return Ok(record),
            (from, _) => return Err(transition(&record, from, target)),
        }

        self.persist(partition, &record).await?;
        tracing::info!(id = %record.id, "Recommendation marked executed.");
        Ok(record)
    }

    /// Records the realized profit of an executed record and closes it.
    pub async fn update_trade_result(&self, id: &str, profit: f64) -> Result<RecommendationRecord> {
        if !profit.is_finite() {
            return Err(Error::InvalidProfit(profit));
        }

        let _guard = self.inner.lock.write().await;

        let (partition, mut record) = self.find(id).await?;
        if record.status != RecordStatus::Executed {
            return Err(transition(&record, record.status, RecordStatus::Closed));
        }

        record.actual_profit = Some(profit);
        record.exit_time = Some(self.now());
        record.status = RecordStatus::Closed;

        self.persist(partition, &record).await?;
        tracing::info!(id = %record.id, profit, "Trade result recorded.");
        Ok(record)
    }

    /// Moves every pending record created more than `max_age` ago to `expired`.
    ///
    /// Returns the records that were expired by this sweep.
    pub async fn expire_stale(&self, max_age: Duration) -> Result<Vec<RecommendationRecord>> {
        let _guard = self.inner.lock.write().await;

        let cutoff = self.now() - max_age;
        let mut expired = Vec::new();
        for partition in self.inner.store.partitions().await? {
            let stale: Vec<RecommendationRecord> = self
                .inner
                .store
                .get_all(partition)
                .await?
                .into_iter()
                .filter(|r| r.status == RecordStatus::Pending && r.timestamp < cutoff)
                .map(|mut r| {
                    r.status = RecordStatus::Expired;
                    r
                })
                .collect();
            if stale.is_empty() {
                continue;
            }

            self.inner.store.update_many(partition, &stale).await?;
            tracing::info!(%partition, count = stale.len(), "Expired stale recommendations.");
            expired.extend(stale);
        }

        Ok(expired)
    }

    // --- Readers ---

    /// Aggregates every record created strictly between `start` and `end`.
    ///
    /// A partition that cannot be decoded is skipped with a warning so one bad
    /// month does not hide the rest of the history.
    pub async fn get_metrics(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<PerformanceMetrics> {
        let records = {
            let _guard = self.inner.lock.read().await;
            self.load_range(start, end).await?
        };
        Ok(AnalyticsEngine::new().calculate(&records, end))
    }

    /// Sum of the profits realized by trades closed after `since`, up to now.
    ///
    /// Records are selected by exit time, so a trade opened weeks ago and closed
    /// today counts toward today. Unreadable partitions are skipped with a warning.
    pub async fn realized_since(&self, since: DateTime<Utc>) -> Result<f64> {
        let _guard = self.inner.lock.read().await;

        let now = self.now();
        let mut realized = 0.0;
        for partition in self.inner.store.partitions().await? {
            let Some(records) = self.load_readable(partition).await? else {
                continue;
            };
            realized += records
                .iter()
                .filter(|r| r.status == RecordStatus::Closed)
                .filter(|r| r.exit_time.is_some_and(|t| t > since && t <= now))
                .filter_map(RecommendationRecord::realized_profit)
                .sum::<f64>();
        }
        Ok(realized)
    }

    /// The last `limit` records of the current month in insertion order.
    /// A `limit` of zero returns the whole month.
    pub async fn get_recommendation_history(&self, limit: usize) -> Result<Vec<RecommendationRecord>> {
        let _guard = self.inner.lock.read().await;

        let mut records = self.inner.store.get_all(PartitionKey::of(self.now())).await?;
        if limit > 0 && limit < records.len() {
            let skip = records.len() - limit;
            records.drain(..skip);
        }
        Ok(records)
    }

    // --- Internals ---

    async fn load_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<RecommendationRecord>> {
        let mut records = Vec::new();
        if start >= end {
            return Ok(records);
        }

        // Only months that exist on the store are read, however wide the range.
        for partition in self.inner.store.partitions().await? {
            if !partition.overlaps(start, end) {
                continue;
            }
            let Some(loaded) = self.load_readable(partition).await? else {
                continue;
            };
            records.extend(
                loaded
                    .into_iter()
                    .filter(|r| r.timestamp > start && r.timestamp < end),
            );
        }
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    /// Loads a partition for a read-only query. A corrupt partition yields `None`.
    async fn load_readable(&self, partition: PartitionKey) -> Result<Option<Vec<RecommendationRecord>>> {
        match self.inner.store.get_all(partition).await {
            Ok(records) => Ok(Some(records)),
            Err(e @ Error::CorruptPartition { .. }) => {
                tracing::warn!(%partition, error = %e, "Skipping unreadable ledger partition.");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Locates a record by id. Looks in the month encoded in the id first,
    /// then in the current month.
    async fn find(&self, id: &str) -> Result<(PartitionKey, RecommendationRecord)> {
        let current = PartitionKey::of(self.now());
        let mut candidates = Vec::with_capacity(2);
        if let Some(created) = partition_from_id(id) {
            candidates.push(created);
        }
        if !candidates.contains(&current) {
            candidates.push(current);
        }

        for partition in candidates {
            let records = self.inner.store.get_all(partition).await?;
            if let Some(record) = records.into_iter().find(|r| r.id == id) {
                return Ok((partition, record));
            }
        }

        tracing::warn!(id, "Recommendation not found in ledger.");
        Err(Error::RecordNotFound { id: id.to_string() })
    }

    async fn persist(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<()> {
        if self.inner.store.update(partition, record).await? {
            Ok(())
        } else {
            Err(Error::RecordNotFound { id: record.id.clone() })
        }
    }
}

fn transition(record: &RecommendationRecord, from: RecordStatus, to: RecordStatus) -> Error {
    Error::InvalidTransition {
        id: record.id.clone(),
        from,
        to,
    }
}

/// `rec_{unix_secs}_{nanos:09}_{seq}`
fn next_record_id(now: DateTime<Utc>) -> String {
    let seq = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("rec_{}_{:09}_{}", now.timestamp(), now.timestamp_subsec_nanos(), seq)
}

/// The month a record was created in, recovered from the seconds embedded in its id.
fn partition_from_id(id: &str) -> Option<PartitionKey> {
    let secs: i64 = id.strip_prefix("rec_")?.split('_').next()?.parse().ok()?;
    DateTime::from_timestamp(secs, 0).map(PartitionKey::of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::AtomicUsize;

    /// Counts partition reads on top of an in-memory store.
    struct CountingStore {
        inner: MemoryStore,
        reads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PartitionStore for CountingStore {
        fn name(&self) -> &'static str {
            "CountingStore"
        }

        async fn get_all(&self, partition: PartitionKey) -> Result<Vec<RecommendationRecord>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_all(partition).await
        }

        async fn append(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<()> {
            self.inner.append(partition, record).await
        }

        async fn update(&self, partition: PartitionKey, record: &RecommendationRecord) -> Result<bool> {
            self.inner.update(partition, record).await
        }

        async fn partitions(&self) -> Result<Vec<PartitionKey>> {
            self.inner.partitions().await
        }
    }

    #[test]
    fn ids_are_unique_and_encode_their_month() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let a = next_record_id(now);
        let b = next_record_id(now);
        assert_ne!(a, b);
        assert!(a.starts_with(&format!("rec_{}_000000000_", now.timestamp())));
        assert_eq!(partition_from_id(&a), Some(PartitionKey::new(2026, 3)));
    }

    #[test]
    fn foreign_ids_have_no_partition() {
        assert_eq!(partition_from_id("abc"), None);
        assert_eq!(partition_from_id("rec_x_1_2"), None);
    }

    #[tokio::test]
    async fn history_limit_keeps_the_tail() {
        let ledger = PerformanceLedger::new(MemoryStore::new());
        let mut ids = Vec::new();
        for ticker in ["SPY", "QQQ", "IWM"] {
            let candidate = TradeCandidate { ticker: ticker.into(), ..TradeCandidate::default() };
            ids.push(ledger.record_recommendation(candidate).await.unwrap().id);
        }

        let tail: Vec<String> = ledger.get_recommendation_history(2).await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(tail, ids[1..].to_vec());
        assert_eq!(ledger.get_recommendation_history(0).await.unwrap().len(), 3);
        assert_eq!(ledger.get_recommendation_history(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn non_finite_profit_is_rejected_before_lookup() {
        let ledger = PerformanceLedger::new(MemoryStore::new());
        let err = ledger.update_trade_result("rec_missing", f64::NAN).await.unwrap_err();
        assert!(matches!(err, Error::InvalidProfit(_)));
    }

    #[tokio::test]
    async fn unbounded_metrics_range_reads_only_existing_partitions() {
        let reads = Arc::new(AtomicUsize::new(0));
        let store = CountingStore { inner: MemoryStore::new(), reads: reads.clone() };
        let ledger = PerformanceLedger::new(store);
        ledger.record_recommendation(TradeCandidate::default()).await.unwrap();
        reads.store(0, Ordering::SeqCst);

        let end = ledger.now() + Duration::seconds(1);
        let metrics = ledger.get_metrics(DateTime::<Utc>::MIN_UTC, end).await.unwrap();
        assert_eq!(metrics.total_recommendations, 1);
        assert_eq!(reads.load(Ordering::SeqCst), 1);

        let metrics = ledger.get_metrics(end, end - Duration::days(1)).await.unwrap();
        assert_eq!(metrics.total_recommendations, 0);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }
}
