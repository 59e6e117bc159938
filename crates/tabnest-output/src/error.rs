//! Error types for nested XML output.

use tabnest_model::ModelError;
use thiserror::Error;

/// Errors that abort a serialization run.
///
/// Output written before the failure is left as is and must be discarded.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The collection has no starting dataset.
    #[error("no starting dataset configured")]
    NoStartingDataset,

    /// A link points at a dataset that is not in the collection.
    #[error("link from {dataset}.{column} points at unknown dataset {destination}")]
    UnknownDataset {
        dataset: String,
        column: String,
        destination: String,
    },

    /// More than one search link is declared on a dataset being written.
    #[error("dataset {dataset} has {count} search links, at most one is allowed")]
    MultipleSearchLinks { dataset: String, count: usize },

    /// The links lead back to a dataset and value already being written.
    #[error("link cycle: {dataset} is already being written for value {value:?}")]
    LinkCycle {
        dataset: String,
        value: Option<String>,
    },

    /// A column named by a link or filter does not resolve.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The XML writer rejected an event.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for serialization.
pub type Result<T> = std::result::Result<T, SerializeError>;
