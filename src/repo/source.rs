use crate::sheets::RemoteSheetFetcher;
use crate::store::{Record, RecordSet, StoreResult, TabularStore};

/// Where a repository's records were loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    LocalFile,
    /// Nothing to load; the repository starts with no records
    Empty,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Remote => write!(f, "remote sheet"),
            Source::LocalFile => write!(f, "local file"),
            Source::Empty => write!(f, "empty table"),
        }
    }
}

/// Decides once where the records of `logical` come from: the remote sheet when a fetcher is
/// given and one of its sources yields a table that decodes, then the local store, then nothing.
///
/// Remote problems are logged and fall through to the local store. A local file that exists but
/// cannot be decoded is returned as an error.
pub async fn resolve_source<T: Record>(
    logical: &str,
    fetcher: Option<&RemoteSheetFetcher>,
    store: &dyn TabularStore,
) -> StoreResult<(RecordSet<T>, Source)> {
    if let Some(fetcher) = fetcher {
        // Some export endpoints ignore the sheet name, so a table only counts once it decodes
        match fetcher.fetch(logical, &RecordSet::<T>::from_table).await {
            Some(records) => {
                tracing::info!(sheet = logical, records = records.len(), "loaded from remote sheet");
                return Ok((records, Source::Remote));
            }
            None => {
                tracing::info!(sheet = logical, "remote sheet unavailable, falling back to local file");
            }
        }
    }

    match store.read()? {
        Some(table) => {
            let records = RecordSet::<T>::from_table(&table)?;
            tracing::info!(sheet = logical, file = %store.describe(), records = records.len(), "loaded from local file");
            Ok((records, Source::LocalFile))
        }
        None => {
            tracing::info!(sheet = logical, file = %store.describe(), "no local file found, starting empty");
            Ok((RecordSet::default(), Source::Empty))
        }
    }
}
