use crate::store::error::StoreError;
use crate::store::{RowView, StoreResult, Table};
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A typed record with a fixed column schema. Identifiers are stored as text and parsed back on
/// read.
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync;

    /// Columns written to disk, in order
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Self::Id;
    fn to_row(&self) -> Vec<String>;
    fn from_row(row: &RowView<'_>) -> StoreResult<Self>;
}

/// Records in insertion order, with an id index for constant time lookups.
#[derive(Debug, Clone)]
pub struct RecordSet<T: Record> {
    records: Vec<T>,
    index: HashMap<T::Id, usize>,
}

impl<T: Record> Default for RecordSet<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Record> RecordSet<T> {
    /// Decodes every row of `table`. Any undecodable row or repeated id fails the whole table.
    pub fn from_table(table: &Table) -> StoreResult<Self> {
        let mut set = Self::default();
        for row in table.rows() {
            let record = T::from_row(&row)?;
            if set.contains(record.id()) {
                return Err(StoreError::DuplicateId(record.id().to_string()));
            }
            set.push(record);
        }
        Ok(set)
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::with_columns(T::COLUMNS);
        for record in &self.records {
            table.push_row(record.to_row());
        }
        table
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record. The caller guarantees the id is not present yet.
    pub fn push(&mut self, record: T) {
        debug_assert!(!self.contains(record.id()));
        self.index.insert(record.id(), self.records.len());
        self.records.push(record);
    }

    /// Replaces the record with the same id. Returns false when there is no such record.
    pub fn replace(&mut self, record: T) -> bool {
        match self.index.get(&record.id()) {
            Some(&pos) => {
                self.records[pos] = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let pos = self.index.remove(&id)?;
        let record = self.records.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(record)
    }
}
