use crate::store::error::StoreError;
use crate::store::{StoreResult, Table, TabularStore};
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

/// Sheet written on save. Reads always take the first sheet, whatever its name.
const SHEET_NAME: &str = "Sheet1";

/// Integers beyond this lose precision as an Excel number and are written as text
const MAX_EXACT_NUMBER: i64 = 1 << 53;

/// Whole-table storage in the first worksheet of an `.xlsx` workbook, header in the first row.
/// Numbers and booleans are written as typed cells, so the file reads the same in a spreadsheet
/// application as one saved by other tools.
pub struct XlsxStore {
    path: PathBuf,
}

impl XlsxStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("tmp.xlsx")
    }
}

impl TabularStore for XlsxStore {
    fn read(&self) -> StoreResult<Option<Table>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut workbook: Xlsx<_> = Xlsx::new(BufReader::new(file))?;
        let range = workbook.worksheet_range_at(0).ok_or(StoreError::NoWorksheet)??;

        let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
        let Some(header) = rows.next() else {
            return Ok(Some(Table::default()));
        };

        Table::from_rows(header, rows.collect()).map(Some)
    }

    fn write(&self, table: &Table) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, name) in table.columns().iter().enumerate() {
            sheet.write_string(0, column_number(col)?, name.as_str())?;
        }
        for (idx, cells) in table.raw_rows().iter().enumerate() {
            let row = u32::try_from(idx + 1).map_err(|_| StoreError::SheetTooLarge)?;
            for (col, value) in cells.iter().enumerate() {
                write_cell(sheet, row, column_number(col)?, value)?;
            }
        }

        let staging = self.staging_path();
        workbook.save(&staging)?;
        std::fs::rename(&staging, &self.path)?;

        tracing::debug!(path = %self.path.display(), rows = table.len(), "workbook written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn column_number(col: usize) -> StoreResult<u16> {
    u16::try_from(col).map_err(|_| StoreError::SheetTooLarge)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Spreadsheet numbers are floats; whole ones read back the way they were typed
        Data::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_NUMBER as f64 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), XlsxError> {
    if value.is_empty() {
        return Ok(());
    }

    if let Ok(n) = value.parse::<i64>() {
        // Only canonical integers, so "007" or "+1" keep their text
        if n.to_string() == value && n.abs() <= MAX_EXACT_NUMBER {
            sheet.write_number(row, col, n as f64)?;
            return Ok(());
        }
    }

    match value {
        "true" => sheet.write_boolean(row, col, true)?,
        "false" => sheet.write_boolean(row, col, false)?,
        _ => sheet.write_string(row, col, value)?,
    };
    Ok(())
}
