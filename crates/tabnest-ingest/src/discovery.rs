//! Table file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Table files directly inside `dir`, sorted by file name.
///
/// Any regular file counts, whatever its extension. Hidden files (leading
/// `.`) and subdirectories are left out.
pub fn list_table_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = std::fs::read_dir(dir)
        .map_err(read_error)?
        .filter_map(|entry| match entry {
            Ok(entry) => {
                let path = entry.path();
                is_table_file(&path).then_some(Ok(path))
            }
            Err(source) => Some(Err(read_error(source))),
        })
        .collect::<Result<Vec<_>>>()?;
    files.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_table_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));
    path.is_file() && !hidden
}
