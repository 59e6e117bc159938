//! Declared relationships between datasets.

use serde::{Deserialize, Serialize};

/// Reserved row name that removes the row wrapper of a linked dataset.
///
/// Rows of the linked dataset are then written straight into the element
/// that holds the link, which flattens one-to-one joins.
pub const SUPPRESS_ROW_SENTINEL: &str = "#NO#PRINT#";

/// How a link is resolved during serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Nest the matching rows of the destination dataset.
    #[default]
    Join,
    /// Keep a source row only if the destination has a matching row.
    Search,
}

/// Override applied to the row wrapper of the destination dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RowName {
    /// Use the destination dataset's own row-key column or the default tag.
    #[default]
    Inherit,
    /// Use this element name for every nested row.
    Substitute(String),
    /// Do not write a row wrapper at all.
    Suppressed,
}

impl RowName {
    /// Interpret a configured row name, recognizing [`SUPPRESS_ROW_SENTINEL`].
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => Self::Inherit,
            Some(SUPPRESS_ROW_SENTINEL) => Self::Suppressed,
            Some(name) => Self::Substitute(name.to_string()),
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed)
    }

    pub fn substitute(&self) -> Option<&str> {
        match self {
            Self::Substitute(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// A link from a column of one dataset to a column of another.
///
/// Links are immutable once created; the owning dataset keeps them in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    source_column: String,
    destination_dataset: String,
    destination_column: String,
    row_name: RowName,
    kind: LinkKind,
}

impl Link {
    pub fn new(
        source_column: impl Into<String>,
        destination_dataset: impl Into<String>,
        destination_column: impl Into<String>,
        row_name: RowName,
        kind: LinkKind,
    ) -> Self {
        Self {
            source_column: source_column.into(),
            destination_dataset: destination_dataset.into(),
            destination_column: destination_column.into(),
            row_name,
            kind,
        }
    }

    pub fn source_column(&self) -> &str {
        &self.source_column
    }

    pub fn destination_dataset(&self) -> &str {
        &self.destination_dataset
    }

    pub fn destination_column(&self) -> &str {
        &self.destination_column
    }

    pub fn row_name(&self) -> &RowName {
        &self.row_name
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn is_search(&self) -> bool {
        self.kind == LinkKind::Search
    }
}
