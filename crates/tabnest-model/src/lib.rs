//! In-memory model for flat tables that get denormalized into nested XML.
//!
//! A [`Dataset`] is one table with a column set that is frozen after the
//! first row; a [`DatasetCollection`] registers datasets by name and owns the
//! validated [`Link`]s between them.

pub mod collection;
pub mod dataset;
pub mod error;
pub mod link;

pub use collection::DatasetCollection;
pub use dataset::{ColumnState, Dataset, RowCursor};
pub use error::{ModelError, Result};
pub use link::{Link, LinkKind, RowName, SUPPRESS_ROW_SENTINEL};
