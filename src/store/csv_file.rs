use crate::store::{StoreResult, Table, TabularStore};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TabularStore for CsvStore {
    fn read(&self) -> StoreResult<Option<Table>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let table = Table::from_csv_reader(BufReader::new(file))?;
        Ok(Some(table))
    }

    fn write(&self, table: &Table) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Readers of the target never see a half-written file
        let staging = self.staging_path();
        {
            let mut writer = BufWriter::new(File::create(&staging)?);
            table.write_csv(&mut writer)?;
            writer.flush()?;
        }
        std::fs::rename(&staging, &self.path)?;

        tracing::debug!(path = %self.path.display(), rows = table.len(), "table written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
