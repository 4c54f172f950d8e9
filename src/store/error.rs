use thiserror::Error;

// StoreError is the lowest level error type, wrapping errors from the tabular file layer. It does not
// wrap any higher level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("reading workbook: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("writing workbook: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("table does not fit in a worksheet")]
    SheetTooLarge,

    /// A column required by the record schema is not present in the table
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A row has more cells than the header declares
    #[error("row {row}: expected at most {expected} cells, found {found}")]
    RowTooLong { row: usize, expected: usize, found: usize },

    #[error("row {row}: invalid value for {column}: {message}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        message: String,
    },

    /// An item reference list that cannot be decoded into (item, quantity) pairs
    #[error("row {row}: malformed item reference: {message}")]
    MalformedReference { row: usize, message: String },

    #[error("duplicate id: {0}")]
    DuplicateId(String),
}
