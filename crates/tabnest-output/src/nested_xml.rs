//! Denormalizing XML writer.
//!
//! Starting from the collection's starting dataset, every row becomes an
//! element and every exported column becomes a child element carrying the
//! cell value as an attribute. Join links are followed recursively: the rows
//! of the linked dataset whose destination column equals the cell value are
//! written nested under the cell that points at them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use tabnest_model::{Dataset, DatasetCollection, Link, LinkKind, ModelError, RowName};
use tracing::{debug, info, info_span, trace};

use crate::error::{Result, SerializeError};
use crate::naming::TagNaming;

/// Writes a [`DatasetCollection`] as one nested XML document.
#[derive(Debug, Clone)]
pub struct NestedXmlWriter<'a> {
    collection: &'a DatasetCollection,
    naming: TagNaming,
}

impl<'a> NestedXmlWriter<'a> {
    pub fn new(collection: &'a DatasetCollection) -> Self {
        Self {
            collection,
            naming: TagNaming::default(),
        }
    }

    pub fn with_naming(mut self, naming: TagNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn naming(&self) -> &TagNaming {
        &self.naming
    }

    /// Write the document under a `root_tag` element.
    ///
    /// On error, whatever was already written to `writer` is incomplete.
    pub fn write<W: Write>(&self, root_tag: &str, writer: W) -> Result<()> {
        let start = self
            .collection
            .starting_dataset()
            .ok_or(SerializeError::NoStartingDataset)?;
        let span = info_span!("serialize", root_tag, starting_dataset = %start.name());
        let _guard = span.enter();
        let started = Instant::now();

        let mut context = WriteContext {
            collection: self.collection,
            naming: &self.naming,
            xml: Writer::new_with_indent(writer, b' ', 2),
            path: Vec::new(),
            rows_written: 0,
            rows_skipped: 0,
        };
        context.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        context.emit(Event::Start(BytesStart::new(root_tag)))?;
        context.write_dataset(start, None, &RowName::Inherit)?;
        context.emit(Event::End(BytesEnd::new(root_tag)))?;

        let (rows_written, rows_skipped) = (context.rows_written, context.rows_skipped);
        context.xml.into_inner().flush()?;
        info!(
            rows_written,
            rows_skipped,
            duration_ms = started.elapsed().as_millis(),
            "nested XML written"
        );
        Ok(())
    }

    pub fn write_to_string(&self, root_tag: &str) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(root_tag, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| SerializeError::Xml {
            message: e.to_string(),
        })
    }

    /// Write the document to `path`, replacing any existing file.
    ///
    /// A partially written file is left behind on error.
    pub fn write_file(&self, path: &Path, root_tag: &str) -> Result<()> {
        let file = File::create(path)?;
        self.write(root_tag, BufWriter::new(file))
    }
}

/// Filter applied to a dataset reached through a join link.
#[derive(Debug, Clone, Copy)]
struct RowFilter<'v> {
    column: &'v str,
    value: &'v str,
}

/// Search link resolved against the collection.
struct SearchFilter<'d> {
    source_index: usize,
    destination: &'d Dataset,
    destination_column: &'d str,
}

struct WriteContext<'a, W: Write> {
    collection: &'a DatasetCollection,
    naming: &'a TagNaming,
    xml: Writer<W>,
    /// Datasets currently being written, with the value they are filtered on.
    path: Vec<(String, Option<String>)>,
    rows_written: usize,
    rows_skipped: usize,
}

impl<'a, W: Write> WriteContext<'a, W> {
    fn write_dataset(
        &mut self,
        dataset: &Dataset,
        filter: Option<RowFilter<'_>>,
        row_name: &RowName,
    ) -> Result<()> {
        let key = (dataset.name().to_string(), filter.map(|f| f.value.to_string()));
        if self.path.contains(&key) {
            return Err(SerializeError::LinkCycle {
                dataset: key.0,
                value: key.1,
            });
        }
        self.path.push(key);

        let filtered;
        let working = match filter {
            Some(filter) => {
                filtered = dataset.filtered_copy(filter.column, filter.value)?;
                &filtered
            }
            None => dataset,
        };
        debug!(
            dataset = %working.name(),
            depth = self.path.len(),
            rows = working.row_count(),
            "writing dataset"
        );

        let search = self.search_filter(working)?;
        for row in working.rows() {
            if let Some(search) = &search {
                let value = row
                    .get(search.source_index)
                    .map(String::as_str)
                    .unwrap_or_default();
                if !search.destination.has_match(search.destination_column, value)? {
                    trace!(dataset = %working.name(), value, "no search match, row skipped");
                    self.rows_skipped += 1;
                    continue;
                }
            }
            self.write_row(working, row, row_name)?;
        }

        self.path.pop();
        Ok(())
    }

    /// Resolve the search link of `dataset`. More than one is an error.
    fn search_filter(&self, dataset: &Dataset) -> Result<Option<SearchFilter<'a>>> {
        let searches: Vec<&Link> = dataset.links().iter().filter(|l| l.is_search()).collect();
        let link = match searches.as_slice() {
            [] => return Ok(None),
            [link] => *link,
            _ => {
                return Err(SerializeError::MultipleSearchLinks {
                    dataset: dataset.name().to_string(),
                    count: searches.len(),
                });
            }
        };
        let source_index =
            dataset
                .column_index(link.source_column())
                .ok_or_else(|| ModelError::UnknownColumn {
                    dataset: dataset.name().to_string(),
                    column: link.source_column().to_string(),
                })?;
        let destination = self.destination(dataset, link)?;
        let destination_column = destination
            .columns()
            .iter()
            .find(|c| *c == link.destination_column())
            .map(String::as_str)
            .ok_or_else(|| ModelError::UnknownColumn {
                dataset: destination.name().to_string(),
                column: link.destination_column().to_string(),
            })?;
        debug!(
            dataset = %dataset.name(),
            destination = %destination.name(),
            column = %destination_column,
            "filtering rows by search link"
        );
        Ok(Some(SearchFilter {
            source_index,
            destination,
            destination_column,
        }))
    }

    fn destination(&self, dataset: &Dataset, link: &Link) -> Result<&'a Dataset> {
        self.collection
            .get_dataset(link.destination_dataset())
            .ok_or_else(|| SerializeError::UnknownDataset {
                dataset: dataset.name().to_string(),
                column: link.source_column().to_string(),
                destination: link.destination_dataset().to_string(),
            })
    }

    fn write_row(&mut self, dataset: &Dataset, row: &[String], row_name: &RowName) -> Result<()> {
        let naming = self.naming;
        let wrapper = self.open_row(dataset, row, row_name)?;
        let row_key = dataset.row_key_column();

        for (index, column) in dataset.columns().iter().enumerate() {
            let value = row.get(index).map(String::as_str).unwrap_or_default();
            let element = if row_key != Some(column.as_str()) && dataset.is_exported(column) {
                let (tag, attribute) = naming.split(column);
                let mut start = BytesStart::new(tag);
                start.push_attribute((attribute, value));
                self.emit(Event::Start(start))?;
                Some(tag)
            } else {
                None
            };

            let join = dataset
                .find_link_from(column)
                .filter(|link| link.kind() == LinkKind::Join);
            if let Some(link) = join {
                let destination = self.destination(dataset, link)?;
                let filter = RowFilter {
                    column: link.destination_column(),
                    value,
                };
                self.write_dataset(destination, Some(filter), link.row_name())?;
            }

            if let Some(tag) = element {
                self.emit(Event::End(BytesEnd::new(tag)))?;
            }
        }

        if let Some(tag) = wrapper {
            self.emit(Event::End(BytesEnd::new(tag)))?;
        }
        self.rows_written += 1;
        Ok(())
    }

    /// Open the row wrapper element, returning its name. `None` when the
    /// wrapper is suppressed.
    fn open_row(
        &mut self,
        dataset: &Dataset,
        row: &[String],
        row_name: &RowName,
    ) -> Result<Option<String>> {
        if row_name.is_suppressed() {
            return Ok(None);
        }
        let naming = self.naming;
        let tag = match (dataset.row_key_column(), row_name.substitute()) {
            (Some(key), substitute) => {
                let (tag, attribute) = naming.split(key);
                let tag = substitute.unwrap_or(tag).to_string();
                let mut start = BytesStart::new(tag.as_str());
                start.push_attribute((attribute, dataset.cell(row, key).unwrap_or_default()));
                self.emit(Event::Start(start))?;
                tag
            }
            (None, Some(substitute)) => {
                self.emit(Event::Start(BytesStart::new(substitute)))?;
                substitute.to_string()
            }
            (None, None) => {
                self.emit(Event::Start(BytesStart::new(naming.default_row_tag.as_str())))?;
                naming.default_row_tag.clone()
            }
        };
        Ok(Some(tag))
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.xml.write_event(event).map_err(|e| SerializeError::Xml {
            message: e.to_string(),
        })
    }
}
