//! Ingestion of tabular XML files into [`tabnest_model::Dataset`]s.

pub mod directory;
pub mod discovery;
pub mod error;
pub mod xml_table;

pub use directory::read_directory;
pub use discovery::list_table_files;
pub use error::{IngestError, Result};
pub use xml_table::{ReadOptions, read_table_file, read_table_str};
