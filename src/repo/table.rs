use crate::repo::source::{Source, resolve_source};
use crate::sheets::RemoteSheetFetcher;
use crate::store::{Record, RecordSet, StoreResult, TabularStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory record set backed by a tabular store.
///
/// Reads take the read lock on the current record set and never wait for file IO. Mutations are
/// serialized by `writer`: each one applies its change to a staged copy, writes the whole staged
/// table to the store on the blocking pool, and only then swaps it in. A failed write leaves the
/// in-memory state untouched.
pub struct TableRepository<T: Record> {
    records: RwLock<RecordSet<T>>,
    writer: Mutex<()>,
    store: Arc<dyn TabularStore>,
    source: Source,
}

impl<T: Record> TableRepository<T> {
    pub async fn load(
        logical: &str,
        fetcher: Option<&RemoteSheetFetcher>,
        store: Arc<dyn TabularStore>,
    ) -> StoreResult<Self> {
        let (records, source) = resolve_source::<T>(logical, fetcher, store.as_ref()).await?;
        Ok(Self {
            records: RwLock::new(records),
            writer: Mutex::new(()),
            store,
            source,
        })
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn all(&self) -> Vec<T> {
        self.records.read().iter().cloned().collect()
    }

    pub fn get(&self, id: T::Id) -> Option<T> {
        self.records.read().get(id).cloned()
    }

    pub fn filter(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.records.read().iter().filter(|r| keep(r)).cloned().collect()
    }

    /// Builds a record around an id that is not in use yet, appends it and persists.
    pub async fn insert_with(&self, new_id: impl Fn() -> T::Id, build: impl FnOnce(T::Id) -> T) -> StoreResult<T> {
        let _writer = self.writer.lock().await;

        let mut staged = self.records.read().clone();
        let mut id = new_id();
        while staged.contains(id) {
            id = new_id();
        }
        let record = build(id);
        staged.push(record.clone());

        self.commit(staged).await?;
        tracing::debug!(id = %id, "record created");
        Ok(record)
    }

    /// Replaces the record with the same id and persists. `None` when there is no such record.
    pub async fn replace(&self, record: T) -> StoreResult<Option<T>> {
        let _writer = self.writer.lock().await;

        let mut staged = self.records.read().clone();
        if !staged.contains(record.id()) {
            return Ok(None);
        }
        staged.replace(record.clone());

        self.commit(staged).await?;
        tracing::debug!(id = %record.id(), "record updated");
        Ok(Some(record))
    }

    pub async fn remove(&self, id: T::Id) -> StoreResult<bool> {
        let _writer = self.writer.lock().await;

        let mut staged = self.records.read().clone();
        if !staged.contains(id) {
            return Ok(false);
        }
        staged.remove(id);

        self.commit(staged).await?;
        tracing::debug!(id = %id, "record deleted");
        Ok(true)
    }

    /// Persists `staged` and makes it current. Callers hold the writer lock.
    async fn commit(&self, staged: RecordSet<T>) -> StoreResult<()> {
        let store = self.store.clone();
        let table = staged.to_table();

        tokio::task::spawn_blocking(move || store.write(&table))
            .await
            .map_err(std::io::Error::from)?
            .inspect_err(|e| {
                tracing::error!(file = %self.store.describe(), error = %e, "failed to persist table");
            })?;

        *self.records.write() = staged;
        Ok(())
    }
}
