use crate::store::error::StoreError;
use std::path::Path;
use std::sync::Arc;

mod csv_file; // Persistent storage
mod memory; // Ephemeral storage
mod record;
mod xlsx_file; // Persistent storage, spreadsheet workbooks

pub mod error;
pub mod table;

pub use csv_file::CsvStore;
pub use memory::MemoryStore;
pub use record::{Record, RecordSet};
pub use table::{RowView, Table};
pub use xlsx_file::XlsxStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// A named tabular file. Reads and writes always cover the whole table; there are no partial
/// updates.
pub trait TabularStore: Send + Sync {
    /// Reads the full table, or `None` when the backing file does not exist yet.
    fn read(&self) -> StoreResult<Option<Table>>;

    /// Replaces the stored table with `table`.
    fn write(&self, table: &Table) -> StoreResult<()>;

    /// Human readable location, for logging
    fn describe(&self) -> String;
}

/// Store for a local data file, chosen by extension: `.xlsx` workbooks, anything else as CSV.
pub fn open_file(path: &Path) -> Arc<dyn TabularStore> {
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));

    if is_workbook {
        Arc::new(XlsxStore::new(path))
    } else {
        Arc::new(CsvStore::new(path))
    }
}
