//! Error types for reading tabular XML files.

use std::path::PathBuf;

use tabnest_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading table files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Malformed XML.
    #[error("invalid XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    /// An element that does not belong at this position of a table.
    #[error("unexpected element <{element}> in {path}")]
    UnexpectedElement { path: PathBuf, element: String },

    /// A row does not fit the column set fixed by the first row.
    #[error("row {row} of {path} does not match the table shape: {source}")]
    Shape {
        path: PathBuf,
        row: usize,
        #[source]
        source: ModelError,
    },

    /// The document ended before the table element was closed.
    #[error("table in {path} is not closed")]
    Truncated { path: PathBuf },

    /// Two files produced the same dataset name.
    #[error("could not register {path}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
