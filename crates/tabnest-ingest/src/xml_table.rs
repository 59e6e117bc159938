//! Streaming reader for one-table-per-file XML documents.
//!
//! The expected layout is a table element holding repeated row elements,
//! each row holding one child element per column:
//!
//! ```xml
//! <table>
//!   <row><route_id>r1</route_id><name>Red</name></row>
//!   <row><route_id>r2</route_id><name/></row>
//! </table>
//! ```
//!
//! The first row defines the columns; every later row must list exactly the
//! same columns in the same order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tabnest_model::{Dataset, ModelError};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Element names used by the table layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub table_tag: String,
    pub row_tag: String,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            table_tag: "table".to_string(),
            row_tag: "row".to_string(),
        }
    }
}

/// Read a table file into a finished dataset named after the file.
pub fn read_table_file(path: &Path, options: &ReadOptions) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dataset = TableParser::new(&name, path, options)
        .parse(Reader::from_reader(BufReader::new(file)))?;
    debug!(
        dataset = %dataset.name(),
        columns = dataset.columns().len(),
        rows = dataset.row_count(),
        "read table file"
    );
    Ok(dataset)
}

/// Read a table held in memory. `name` becomes the dataset name.
pub fn read_table_str(name: &str, xml: &str, options: &ReadOptions) -> Result<Dataset> {
    TableParser::new(name, Path::new(name), options).parse(Reader::from_str(xml))
}

#[derive(Debug)]
enum Position {
    Outside,
    Table,
    Row,
    Cell { column: String, text: String },
    Done,
}

struct TableParser<'a> {
    path: &'a Path,
    options: &'a ReadOptions,
    dataset: Dataset,
    position: Position,
}

impl<'a> TableParser<'a> {
    fn new(name: &str, path: &'a Path, options: &'a ReadOptions) -> Self {
        Self {
            path,
            options,
            dataset: Dataset::new(name),
            position: Position::Outside,
        }
    }

    fn parse<R: BufRead>(mut self, mut reader: Reader<R>) -> Result<Dataset> {
        let mut buf = Vec::new();
        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| self.xml_error(e))?;
            match event {
                Event::Start(e) => {
                    let name = element_name(e.local_name().as_ref());
                    self.open(name)?;
                }
                Event::Empty(e) => {
                    let name = element_name(e.local_name().as_ref());
                    self.open(name.clone())?;
                    self.close(&name)?;
                }
                Event::End(e) => {
                    let name = element_name(e.local_name().as_ref());
                    self.close(&name)?;
                }
                Event::Text(e) => {
                    let raw = std::str::from_utf8(&e).map_err(|e| self.xml_error(e))?;
                    let text = quick_xml::escape::unescape(raw).map_err(|e| self.xml_error(e))?;
                    self.text(&text);
                }
                Event::CData(e) => {
                    let raw = std::str::from_utf8(&e).map_err(|e| self.xml_error(e))?;
                    self.text(raw);
                }
                Event::GeneralRef(e) => {
                    let entity = std::str::from_utf8(&e).map_err(|e| self.xml_error(e))?;
                    let resolved = resolve_reference(entity)
                        .ok_or_else(|| self.xml_error(format!("unknown entity &{entity};")))?;
                    self.text(&resolved);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        match self.position {
            Position::Done => Ok(self.dataset),
            _ => Err(IngestError::Truncated {
                path: self.path.to_path_buf(),
            }),
        }
    }

    fn open(&mut self, element: String) -> Result<()> {
        match self.position {
            Position::Outside if element == self.options.table_tag => {
                self.position = Position::Table;
            }
            Position::Table if element == self.options.row_tag => {
                self.dataset.begin_row().map_err(|e| self.shape_error(e))?;
                self.position = Position::Row;
            }
            Position::Row => {
                if !self.dataset.is_locked() && !self.dataset.has_column(&element) {
                    self.dataset
                        .add_column(element.as_str())
                        .map_err(|e| self.shape_error(e))?;
                }
                self.position = Position::Cell {
                    column: element,
                    text: String::new(),
                };
            }
            _ => {
                return Err(IngestError::UnexpectedElement {
                    path: self.path.to_path_buf(),
                    element,
                });
            }
        }
        Ok(())
    }

    fn close(&mut self, element: &str) -> Result<()> {
        match std::mem::replace(&mut self.position, Position::Outside) {
            Position::Cell { column, text } => {
                self.dataset
                    .set_cell(&column, text.trim())
                    .map_err(|e| self.shape_error(e))?;
                self.position = Position::Row;
            }
            Position::Row => {
                self.dataset.lock_columns();
                self.position = Position::Table;
            }
            Position::Table => {
                self.dataset
                    .mark_finished()
                    .map_err(|e| self.shape_error(e))?;
                self.position = Position::Done;
            }
            Position::Outside | Position::Done => {
                return Err(IngestError::UnexpectedElement {
                    path: self.path.to_path_buf(),
                    element: element.to_string(),
                });
            }
        }
        Ok(())
    }

    fn text(&mut self, value: &str) {
        match &mut self.position {
            Position::Cell { text, .. } => text.push_str(value),
            _ if value.trim().is_empty() => {}
            _ => warn!(path = %self.path.display(), "ignoring text outside of a cell"),
        }
    }

    fn shape_error(&self, source: ModelError) -> IngestError {
        IngestError::Shape {
            path: self.path.to_path_buf(),
            row: self.dataset.row_count(),
            source,
        }
    }

    fn xml_error(&self, err: impl std::fmt::Display) -> IngestError {
        IngestError::Xml {
            path: self.path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Resolve a character reference or one of the predefined XML entities.
fn resolve_reference(entity: &str) -> Option<String> {
    if let Some(code) = entity.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    quick_xml::escape::resolve_predefined_entity(entity).map(str::to_string)
}
