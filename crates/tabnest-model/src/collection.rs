//! Named registry of datasets and the links between them.

use crate::dataset::Dataset;
use crate::error::{ModelError, Result};
use crate::link::{Link, LinkKind, RowName};

/// Every dataset of one conversion, keyed by name, plus the dataset that
/// serialization starts from.
///
/// Links are only created through [`DatasetCollection::add_link`], so a
/// dataset never names another one without the names having been checked.
#[derive(Debug, Clone, Default)]
pub struct DatasetCollection {
    datasets: Vec<Dataset>,
    starting_dataset: Option<String>,
}

impl DatasetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicate names.
    pub fn with_datasets(datasets: impl IntoIterator<Item = Dataset>) -> Result<Self> {
        let mut collection = Self::new();
        for dataset in datasets {
            collection.insert(dataset)?;
        }
        Ok(collection)
    }

    pub fn insert(&mut self, dataset: Dataset) -> Result<()> {
        if self.get_dataset(dataset.name()).is_some() {
            return Err(ModelError::DuplicateDataset {
                name: dataset.name().to_string(),
            });
        }
        self.datasets.push(dataset);
        Ok(())
    }

    pub fn get_dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|dataset| dataset.name() == name)
    }

    pub fn get_dataset_mut(&mut self, name: &str) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|dataset| dataset.name() == name)
    }

    fn require_dataset(&self, name: &str) -> Result<&Dataset> {
        self.get_dataset(name)
            .ok_or_else(|| ModelError::UnknownDataset {
                name: name.to_string(),
            })
    }

    fn require_dataset_mut(&mut self, name: &str) -> Result<&mut Dataset> {
        self.get_dataset_mut(name)
            .ok_or_else(|| ModelError::UnknownDataset {
                name: name.to_string(),
            })
    }

    /// Names in insertion order.
    pub fn dataset_names(&self) -> Vec<&str> {
        self.datasets.iter().map(Dataset::name).collect()
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Declare a link after checking that both datasets and both columns
    /// exist and that the link leaves its source dataset. Nothing changes
    /// when a check fails.
    pub fn add_link(
        &mut self,
        source_dataset: &str,
        source_column: &str,
        destination_dataset: &str,
        destination_column: &str,
        row_name: RowName,
        kind: LinkKind,
    ) -> Result<()> {
        if source_dataset == destination_dataset {
            return Err(ModelError::SelfLink {
                dataset: source_dataset.to_string(),
            });
        }
        let destination = self.require_dataset(destination_dataset)?;
        if !destination.has_column(destination_column) {
            return Err(ModelError::UnknownColumn {
                dataset: destination_dataset.to_string(),
                column: destination_column.to_string(),
            });
        }
        let source = self.require_dataset_mut(source_dataset)?;
        if !source.has_column(source_column) {
            return Err(ModelError::UnknownColumn {
                dataset: source_dataset.to_string(),
                column: source_column.to_string(),
            });
        }
        source.add_link(Link::new(
            source_column,
            destination_dataset,
            destination_column,
            row_name,
            kind,
        ));
        Ok(())
    }

    pub fn set_starting_dataset(&mut self, name: &str) -> Result<()> {
        self.require_dataset(name)?;
        self.starting_dataset = Some(name.to_string());
        Ok(())
    }

    pub fn starting_dataset_name(&self) -> Option<&str> {
        self.starting_dataset.as_deref()
    }

    pub fn starting_dataset(&self) -> Option<&Dataset> {
        self.starting_dataset
            .as_deref()
            .and_then(|name| self.get_dataset(name))
    }

    pub fn set_export_columns<I, S>(&mut self, dataset: &str, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_dataset_mut(dataset)?.set_export_columns(columns)
    }

    pub fn set_row_key_column(&mut self, dataset: &str, column: &str) -> Result<()> {
        self.require_dataset_mut(dataset)?.set_row_key_column(column)
    }
}
