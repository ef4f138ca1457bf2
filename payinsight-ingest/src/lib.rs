//! payinsight-ingest: activity-export document access, transaction record
//! extraction and the tabular (CSV) form of extracted records.

pub mod document;
pub mod error;
pub mod extract;
pub mod table;

pub use document::{ActivityDocument, FragmentSource, RawFragment};
pub use error::{IngestError, Result};
pub use extract::{extract, extract_fragment, extract_text};
pub use table::{read_table, read_table_path, write_table, write_table_path, COLUMNS};
