//! CSV ingestion: parse an upload, map its columns onto job fields, and
//! build the batch sent to the import API.
//!
//! - `parser` - header-delimited text to [`CsvTable`]
//! - `mapping` - [`ColumnMapping`] inference and overrides
//! - `batch` - mapped rows to [`ImportJobPayload`](crate::models::ImportJobPayload)s
//! - `session` - one upload's state from file selection to submit

mod batch;
mod mapping;
mod parser;
mod session;

pub use batch::build_batch;
pub use mapping::{ColumnMapping, ImportField, OPTIONAL_FIELDS, REQUIRED_FIELDS};
pub use parser::{parse_bytes, parse_file, CsvRow, CsvTable};
pub use session::{ImportSession, PREVIEW_ROWS};
