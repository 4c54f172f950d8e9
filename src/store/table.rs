use crate::store::StoreResult;
use crate::store::error::StoreError;
use std::io::{Read, Write};

/// A header plus rows of text cells. This is the shape every tabular source is reduced to,
/// whether it comes from a local file or from a remote spreadsheet export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Empty table with a fixed column schema
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Parse delimited text. The first record is the header; rows shorter than the header are
    /// padded with empty cells, rows longer than the header are rejected.
    pub fn from_csv_reader<R: Read>(reader: R) -> StoreResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let Some(header) = records.next() else {
            return Ok(Self::default());
        };
        let header: Vec<String> = header?.iter().map(|c| c.to_string()).collect();

        let mut rows = Vec::new();
        for record in records {
            rows.push(record?.iter().map(|c| c.to_string()).collect());
        }

        Self::from_rows(header, rows)
    }

    /// Builds a table from a header and raw rows, with the same padding and length rules as
    /// [`Table::from_csv_reader`].
    pub fn from_rows(header: Vec<String>, raw_rows: Vec<Vec<String>>) -> StoreResult<Self> {
        let columns: Vec<String> = header.iter().map(|c| c.trim().to_string()).collect();

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (idx, mut row) in raw_rows.into_iter().enumerate() {
            if row.len() > columns.len() {
                return Err(StoreError::RowTooLong {
                    row: idx + 1,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn from_csv_str(s: &str) -> StoreResult<Self> {
        Self::from_csv_reader(s.as_bytes())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> StoreResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Removes rows whose cells are all blank, then columns whose data cells are all blank.
    pub fn drop_empty(mut self) -> Self {
        self.rows.retain(|row| row.iter().any(|c| !c.trim().is_empty()));

        let keep: Vec<bool> = (0..self.columns.len())
            .map(|col| self.rows.iter().any(|row| !row[col].trim().is_empty()))
            .collect();

        let mut keep_iter = keep.iter();
        self.columns.retain(|_| *keep_iter.next().unwrap_or(&false));
        for row in &mut self.rows {
            let mut keep_iter = keep.iter();
            row.retain(|_| *keep_iter.next().unwrap_or(&false));
        }

        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows as raw cells, in column order
    pub fn raw_rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.rows.len()).map(move |index| RowView { table: self, index })
    }

    /// Number of data rows (the header does not count)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

/// Read access to one row of a [`Table`], addressed by column name.
#[derive(Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowView<'a> {
    /// 1-based data row number, used in error messages
    pub fn number(&self) -> usize {
        self.index + 1
    }

    fn cell(&self, column: &str) -> Option<&'a str> {
        let col = self.table.column_index(column)?;
        Some(self.table.rows[self.index][col].trim())
    }

    /// Text cell, trimmed. A missing column reads as blank: cleanup of remote sheets drops columns
    /// whose cells are all blank, so the two cannot be told apart.
    pub fn text(&self, column: &'static str) -> &'a str {
        self.cell(column).unwrap_or("")
    }

    /// Cell that must be present, trimmed
    pub fn required(&self, column: &'static str) -> StoreResult<&'a str> {
        self.cell(column).ok_or_else(|| StoreError::MissingColumn(column.to_string()))
    }

    /// Optional cell. A missing column and a blank cell both yield `None`.
    pub fn optional(&self, column: &'static str) -> Option<String> {
        self.cell(column).filter(|s| !s.is_empty()).map(|s| s.to_string())
    }

    /// Integer cell. Spreadsheet exports sometimes render integers as `10.0`, which is accepted
    /// as long as there is no fractional part.
    pub fn int<T: TryFrom<i64>>(&self, column: &'static str) -> StoreResult<T> {
        let raw = self.required(column)?;
        let value = match raw.parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64),
        };

        value
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| self.invalid(column, format!("'{raw}' is not an integer")))
    }

    pub fn bool(&self, column: &'static str) -> StoreResult<bool> {
        let raw = self.required(column)?;
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "1.0" | "yes" | "y" => Ok(true),
            "false" | "0" | "0.0" | "no" | "n" => Ok(false),
            _ => Err(self.invalid(column, format!("'{raw}' is not a boolean"))),
        }
    }

    pub fn parse<T>(&self, column: &'static str) -> StoreResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.required(column)?;
        raw.parse().map_err(|e: T::Err| self.invalid(column, format!("'{raw}': {e}")))
    }

    pub fn invalid(&self, column: &'static str, message: String) -> StoreError {
        StoreError::InvalidCell {
            row: self.number(),
            column,
            message,
        }
    }
}
