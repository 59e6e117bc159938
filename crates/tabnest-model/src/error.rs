use thiserror::Error;

/// Errors raised by dataset mutation and collection configuration.
///
/// A failed operation never leaves partial state behind: the dataset or
/// collection is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("columns of {dataset} are locked")]
    ColumnsLocked { dataset: String },

    #[error("column {column} already exists in {dataset}")]
    DuplicateColumn { dataset: String, column: String },

    #[error("dataset {dataset} is finished and can no longer be modified")]
    Finished { dataset: String },

    #[error("row {row} of {dataset} has {actual} of {expected} cells")]
    IncompleteRow {
        dataset: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} of {dataset} has more than {expected} cells")]
    RowOverflow {
        dataset: String,
        row: usize,
        expected: usize,
    },

    #[error("no row has been started in {dataset}")]
    NoOpenRow { dataset: String },

    #[error("unknown column {column} in {dataset}")]
    UnknownColumn { dataset: String, column: String },

    #[error("cell {column} of {dataset} is out of order: next cell is column #{expected_index}")]
    CellOutOfOrder {
        dataset: String,
        column: String,
        expected_index: usize,
    },

    #[error("a link cannot start and end in {dataset}")]
    SelfLink { dataset: String },

    #[error("unknown dataset {name}")]
    UnknownDataset { name: String },

    #[error("dataset {name} is already registered")]
    DuplicateDataset { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
