//! Export plans: the TOML file that configures a conversion.
//!
//! ```toml
//! root_tag = "services"
//! starting_dataset = "trips.txt"
//!
//! [[dataset]]
//! name = "trips.txt"
//! row_key = "service_id"
//!
//! [[link]]
//! from = "trips.txt"
//! column = "route_id"
//! to = "routes.txt"
//! to_column = "route_id"
//! row_name = "#NO#PRINT#"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tabnest_model::{DatasetCollection, LinkKind, ModelError, RowName};
use tabnest_output::TagNaming;
use tabnest_output::naming::{ALTERNATE_ATTRIBUTE, DEFAULT_ROW_TAG, PRIMARY_ATTRIBUTE};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_ROOT_TAG: &str = "root";

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("dataset entry {name} rejected: {source}")]
    Dataset {
        name: String,
        #[source]
        source: ModelError,
    },

    #[error("link {from}.{column} -> {to}.{to_column} rejected: {source}")]
    Link {
        from: String,
        column: String,
        to: String,
        to_column: String,
        #[source]
        source: ModelError,
    },

    #[error("starting dataset {name} rejected: {source}")]
    StartingDataset {
        name: String,
        #[source]
        source: ModelError,
    },
}

/// Everything needed to turn a collection of datasets into one document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportPlan {
    #[serde(default = "default_root_tag")]
    pub root_tag: String,
    pub starting_dataset: String,
    #[serde(default)]
    pub naming: NamingPlan,
    #[serde(default, rename = "dataset")]
    pub datasets: Vec<DatasetPlan>,
    #[serde(default, rename = "link")]
    pub links: Vec<LinkPlan>,
}

/// `[naming]` table; missing keys keep the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingPlan {
    pub primary_attribute: String,
    pub alternate_attribute: String,
    pub default_row_tag: String,
}

impl Default for NamingPlan {
    fn default() -> Self {
        Self {
            primary_attribute: PRIMARY_ATTRIBUTE.to_string(),
            alternate_attribute: ALTERNATE_ATTRIBUTE.to_string(),
            default_row_tag: DEFAULT_ROW_TAG.to_string(),
        }
    }
}

/// `[[dataset]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetPlan {
    pub name: String,
    pub row_key: Option<String>,
    pub export: Option<Vec<String>>,
}

/// `[[link]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkPlan {
    pub from: String,
    pub column: String,
    pub to: String,
    pub to_column: String,
    pub row_name: Option<String>,
    #[serde(default)]
    pub kind: LinkKind,
}

fn default_root_tag() -> String {
    DEFAULT_ROOT_TAG.to_string()
}

impl FromStr for ExportPlan {
    type Err = toml::de::Error;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        toml::from_str(contents)
    }
}

impl ExportPlan {
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse().map_err(|source| PlanError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn naming(&self) -> TagNaming {
        TagNaming {
            primary_attribute: self.naming.primary_attribute.clone(),
            alternate_attribute: self.naming.alternate_attribute.clone(),
            default_row_tag: self.naming.default_row_tag.clone(),
        }
    }

    /// Apply dataset settings, then links, then the starting dataset.
    ///
    /// Stops at the first entry the collection rejects. Entries applied
    /// before it stay applied.
    pub fn apply(&self, collection: &mut DatasetCollection) -> Result<(), PlanError> {
        for dataset in &self.datasets {
            let rejected = |source| PlanError::Dataset {
                name: dataset.name.clone(),
                source,
            };
            if let Some(export) = &dataset.export {
                collection
                    .set_export_columns(&dataset.name, export.iter().cloned())
                    .map_err(rejected)?;
            }
            if let Some(row_key) = &dataset.row_key {
                collection
                    .set_row_key_column(&dataset.name, row_key)
                    .map_err(rejected)?;
            }
            debug!(dataset = %dataset.name, "applied dataset settings");
        }

        for link in &self.links {
            collection
                .add_link(
                    &link.from,
                    &link.column,
                    &link.to,
                    &link.to_column,
                    RowName::parse(link.row_name.as_deref()),
                    link.kind,
                )
                .map_err(|source| PlanError::Link {
                    from: link.from.clone(),
                    column: link.column.clone(),
                    to: link.to.clone(),
                    to_column: link.to_column.clone(),
                    source,
                })?;
        }

        collection
            .set_starting_dataset(&self.starting_dataset)
            .map_err(|source| PlanError::StartingDataset {
                name: self.starting_dataset.clone(),
                source,
            })?;

        info!(
            datasets = self.datasets.len(),
            links = self.links.len(),
            starting_dataset = %self.starting_dataset,
            "export plan applied"
        );
        Ok(())
    }
}
