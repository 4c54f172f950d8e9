use crate::store::{StoreResult, Table, TabularStore};
use parking_lot::RwLock;

/// Keeps the table in memory only. Starts out "absent" unless seeded.
#[derive(Default)]
pub struct MemoryStore {
    table: RwLock<Option<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(table: Table) -> Self {
        Self {
            table: RwLock::new(Some(table)),
        }
    }

    /// Last written table, if any
    pub fn snapshot(&self) -> Option<Table> {
        self.table.read().clone()
    }
}

impl TabularStore for MemoryStore {
    fn read(&self) -> StoreResult<Option<Table>> {
        Ok(self.table.read().clone())
    }

    fn write(&self, table: &Table) -> StoreResult<()> {
        *self.table.write() = Some(table.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
