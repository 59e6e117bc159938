//! Load every table of a directory into a collection.

use std::path::Path;
use std::time::Instant;

use tabnest_model::DatasetCollection;
use tracing::{debug, info, info_span};

use crate::discovery::list_table_files;
use crate::error::{IngestError, Result};
use crate::xml_table::{ReadOptions, read_table_file};

/// Read all table files of `dir`.
///
/// The first file that fails to parse aborts the whole read; the error
/// carries that file's path.
pub fn read_directory(dir: &Path, options: &ReadOptions) -> Result<DatasetCollection> {
    let span = info_span!("read_directory", dir = %dir.display());
    let _guard = span.enter();

    let start = Instant::now();
    let files = list_table_files(dir)?;
    debug!(file_count = files.len(), "discovered table files");

    let mut collection = DatasetCollection::new();
    for path in &files {
        let dataset = read_table_file(path, options)?;
        collection
            .insert(dataset)
            .map_err(|source| IngestError::Register {
                path: path.clone(),
                source,
            })?;
    }

    info!(
        dataset_count = collection.len(),
        duration_ms = start.elapsed().as_millis(),
        "read input directory"
    );
    Ok(collection)
}
