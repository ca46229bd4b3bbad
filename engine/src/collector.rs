//! Collector - resumable, batch-bounded ingestion of a vendor catalog.
//!
//! A collector owns three record stores:
//!
//! - the **list**: the authoritative catalog as last fetched from the vendor
//! - the **checkpoint**: records collected so far in the current cycle
//! - the **collection**: the last fully completed cycle
//!
//! Each [`Collector::collect`] call walks at most `batch_size` list entries
//! starting where the checkpoint ends, persists the grown checkpoint, and
//! copies it into the collection once every entry has been collected. The
//! engine never loops beyond one batch; callers use
//! [`Collector::left_calls_count`] to plan how many more invocations remain.
//!
//! A crash between the transform loop and the checkpoint save loses at most
//! one batch of work, which is redone by the next call.

use crate::{
    config::CollectorConfig,
    error::Result,
    store::{LoadOutcome, RecordStore},
    Error, Record, VendorGateway,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default maximum number of items processed per `collect()` call.
pub const BATCH_SIZE: usize = 200;

/// Where a collection cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionState {
    /// The vendor list is empty; the collection is finalized empty
    Empty,
    /// Some list entries have not been collected yet
    InProgress,
    /// Every list entry has been collected
    Complete,
}

/// Point-in-time view of the collector counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProgress {
    pub state: CollectionState,
    pub total_count: usize,
    pub collected_count: usize,
    pub left_count: usize,
    pub left_calls_count: usize,
    pub batch_size: usize,
}

/// Resumable collection engine over a [`VendorGateway`].
#[derive(Debug)]
pub struct Collector<G> {
    gateway: G,
    list: RecordStore,
    checkpoint: RecordStore,
    collection: RecordStore,
    batch_size: usize,
    total_count: usize,
    collected_count: usize,
    /// The checkpoint was cleared in memory but the empty file is not written yet
    reset_pending: bool,
    /// The collection file exists on disk
    collection_on_disk: bool,
}

impl<G: VendorGateway> Collector<G> {
    /// Open a collector with the default batch size.
    pub fn new(
        list_path: impl Into<PathBuf>,
        checkpoint_path: impl Into<PathBuf>,
        collection_path: impl Into<PathBuf>,
        gateway: G,
    ) -> Result<Self> {
        let config = CollectorConfig::new(list_path, checkpoint_path, collection_path);
        Self::open(&config, gateway)
    }

    /// Open a collector.
    ///
    /// The list is loaded from disk, or imported from the gateway when the
    /// file is missing or cannot be decoded. Missing checkpoint and
    /// collection files start out empty; any other failure to read them
    /// is returned.
    pub fn open(config: &CollectorConfig, gateway: G) -> Result<Self> {
        config.validate()?;

        let mut collector = Self {
            gateway,
            list: RecordStore::with_path(&config.list_path)?,
            checkpoint: RecordStore::with_path(&config.checkpoint_path)?,
            collection: RecordStore::with_path(&config.collection_path)?,
            batch_size: config.batch_size,
            total_count: 0,
            collected_count: 0,
            reset_pending: false,
            collection_on_disk: false,
        };

        collector.load_list()?;
        collector.checkpoint.load_if_present()?;
        collector.collection_on_disk =
            collector.collection.load_if_present()? == LoadOutcome::Loaded;
        collector.sync_collected_count();

        tracing::debug!(
            total = collector.total_count,
            collected = collector.collected_count,
            "Collector opened"
        );
        Ok(collector)
    }

    fn load_list(&mut self) -> Result<()> {
        match self.list.load() {
            Ok(()) => {}
            Err(Error::FileNotFound(_)) | Err(Error::UnexpectedResult(_)) => self.import_list()?,
            Err(e) => return Err(e),
        }
        self.total_count = self.list.len();
        Ok(())
    }

    fn import_list(&mut self) -> Result<()> {
        let list = self.gateway.full_list()?;
        tracing::info!(
            path = ?self.list.path(),
            records = list.len(),
            "Imported list from vendor"
        );
        self.list.replace(list)
    }

    /// Keep `collected_count` in line with the checkpoint, discarding a
    /// checkpoint that no longer fits the list.
    fn sync_collected_count(&mut self) {
        if self.checkpoint.len() > self.total_count {
            tracing::warn!(
                checkpoint = self.checkpoint.len(),
                total = self.total_count,
                "Checkpoint is larger than the list, discarding it"
            );
            self.reset_collection();
        }
        self.collected_count = self.checkpoint.len();
    }

    /// Number of list entries in the current cycle.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of entries already collected in the current cycle.
    pub fn collected_count(&self) -> usize {
        self.collected_count
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Entries still to collect.
    pub fn left_count(&self) -> usize {
        if self.total_count == 0 {
            return 0;
        }
        self.total_count.saturating_sub(self.collected_count)
    }

    /// `collect()` calls still needed to finish the cycle.
    pub fn left_calls_count(&self) -> usize {
        self.left_count().div_ceil(self.batch_size)
    }

    pub fn state(&self) -> CollectionState {
        if self.total_count == 0 {
            CollectionState::Empty
        } else if self.collected_count >= self.total_count {
            CollectionState::Complete
        } else {
            CollectionState::InProgress
        }
    }

    pub fn progress(&self) -> CollectionProgress {
        CollectionProgress {
            state: self.state(),
            total_count: self.total_count,
            collected_count: self.collected_count,
            left_count: self.left_count(),
            left_calls_count: self.left_calls_count(),
            batch_size: self.batch_size,
        }
    }

    /// Collect the next batch and return how many entries are left.
    ///
    /// The checkpoint is reloaded first, so progress written by an earlier
    /// invocation is picked up. Gateway or store failures abort the call
    /// before anything is written, leaving the previous state resumable.
    pub fn collect(&mut self) -> Result<usize> {
        if self.reset_pending {
            self.checkpoint.replace(Vec::new())?;
            self.reset_pending = false;
        } else {
            self.checkpoint.load_if_present()?;
        }
        self.sync_collected_count();

        if self.collected_count < self.total_count {
            let start = self.collected_count;
            let end = (start + self.batch_size).min(self.total_count);

            let mut records = self.checkpoint.records().to_vec();
            records.reserve(end - start);
            for item in &self.list.records()[start..end] {
                records.push(self.gateway.collect_item(item)?);
            }
            self.checkpoint.replace(records)?;
            self.collected_count = self.checkpoint.len();

            tracing::debug!(
                processed = end - start,
                collected = self.collected_count,
                total = self.total_count,
                "Batch collected"
            );
        }

        self.finalize_if_complete()?;
        Ok(self.left_count())
    }

    /// Copy a complete checkpoint into the collection.
    ///
    /// Runs whenever every list entry is collected, an empty list included.
    /// It is a no-op when the collection file already holds the checkpoint
    /// content, so a finalize that failed earlier is retried by the next
    /// `collect()`.
    fn finalize_if_complete(&mut self) -> Result<()> {
        if self.collected_count != self.total_count
            || (self.collection_on_disk
                && self.collection.records() == self.checkpoint.records())
        {
            return Ok(());
        }

        self.collection.replace(self.checkpoint.records().to_vec())?;
        self.collection_on_disk = true;
        tracing::info!(
            path = ?self.collection.path(),
            records = self.collection.len(),
            "Collection finalized"
        );
        Ok(())
    }

    /// Compare the vendor's current list with the stored one.
    ///
    /// Returns `false` without writing anything when they are identical
    /// (same records, same order, same value types). Otherwise the new list
    /// is stored, the checkpoint is cleared and `true` is returned. The
    /// collection keeps the last completed cycle until the next finalize.
    pub fn must_recollect(&mut self) -> Result<bool> {
        let fresh = self.gateway.full_list()?;
        if fresh.as_slice() == self.list.records() {
            tracing::debug!(total = self.total_count, "Vendor list unchanged");
            return Ok(false);
        }

        tracing::info!(
            previous = self.total_count,
            current = fresh.len(),
            "Vendor list changed, restarting collection"
        );
        self.list.replace(fresh)?;
        self.total_count = self.list.len();
        self.reset_collection();
        Ok(true)
    }

    /// Clear the checkpoint.
    ///
    /// Persisting the empty checkpoint is best effort: the return value says
    /// whether it reached disk. If it did not, the next `collect()` writes it
    /// before doing anything else.
    pub fn reset_collection(&mut self) -> bool {
        self.checkpoint.clear();
        self.collected_count = 0;

        match self.checkpoint.save() {
            Ok(()) => {
                self.reset_pending = false;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not persist the cleared checkpoint");
                self.reset_pending = true;
                false
            }
        }
    }

    /// First list entry matching `fields`, or an empty record.
    pub fn list_item(&self, fields: &Record) -> Result<Record> {
        self.list.search_item(fields)
    }

    /// List entries matching `fields`; all of them when `fields` is empty.
    pub fn search_on_list(&self, fields: &Record) -> Vec<&Record> {
        self.list.search_all(fields)
    }

    /// First collected record matching `fields`, or an empty record.
    pub fn collection_item(&self, fields: &Record) -> Result<Record> {
        self.collection.search_item(fields)
    }

    /// Collected records matching `fields`; all of them when `fields` is empty.
    pub fn search_on_collection(&self, fields: &Record) -> Vec<&Record> {
        self.collection.search_all(fields)
    }

    pub fn list(&self) -> &RecordStore {
        &self.list
    }

    pub fn checkpoint(&self) -> &RecordStore {
        &self.checkpoint
    }

    pub fn collection(&self) -> &RecordStore {
        &self.collection
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }
}
