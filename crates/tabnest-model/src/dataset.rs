//! A single table of string cells with a frozen column set.

use std::fmt;

use crate::error::{ModelError, Result};
use crate::link::Link;

/// Whether the column set may still change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnState {
    #[default]
    Open,
    Locked,
}

/// One table: named columns, rows filled cell by cell, plus the export
/// configuration and the links declared from its columns.
///
/// Rows are built in column order. Once the dataset is finished it only
/// accepts configuration changes (export set, row key, links), never
/// structural ones.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    column_state: ColumnState,
    rows: Vec<Vec<String>>,
    finished: bool,
    cursor: usize,
    export_columns: Option<Vec<String>>,
    row_key_column: Option<String>,
    links: Vec<Link>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a finished dataset in one go, through the same checks the
    /// incremental operations apply.
    pub fn from_rows<C, R, V>(name: impl Into<String>, columns: C, rows: R) -> Result<Self>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut dataset = Self::new(name);
        for column in columns {
            dataset.add_column(column)?;
        }
        dataset.lock_columns();
        for row in rows {
            dataset.begin_row()?;
            for (index, value) in row.into_iter().enumerate() {
                let column = dataset.columns.get(index).cloned().ok_or_else(|| {
                    ModelError::RowOverflow {
                        dataset: dataset.name.clone(),
                        row: dataset.rows.len() - 1,
                        expected: dataset.columns.len(),
                    }
                })?;
                dataset.set_cell(&column, value)?;
            }
        }
        dataset.mark_finished()?;
        Ok(dataset)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn column_state(&self) -> ColumnState {
        self.column_state
    }

    pub fn is_locked(&self) -> bool {
        self.column_state == ColumnState::Locked
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a column. Rejected once the columns are locked or when the
    /// name is already present.
    pub fn add_column(&mut self, column: impl Into<String>) -> Result<()> {
        let column = column.into();
        if self.is_locked() || self.finished {
            return Err(ModelError::ColumnsLocked {
                dataset: self.name.clone(),
            });
        }
        if self.has_column(&column) {
            return Err(ModelError::DuplicateColumn {
                dataset: self.name.clone(),
                column,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Freeze the column set. Idempotent.
    pub fn lock_columns(&mut self) {
        self.column_state = ColumnState::Locked;
    }

    /// Start a new, empty row. The previous row must be complete.
    ///
    /// Starting any row after the first locks the columns, so every stored
    /// row keeps the full column count.
    pub fn begin_row(&mut self) -> Result<()> {
        if self.finished {
            return Err(ModelError::Finished {
                dataset: self.name.clone(),
            });
        }
        self.ensure_last_row_complete()?;
        if !self.rows.is_empty() {
            self.column_state = ColumnState::Locked;
        }
        self.rows.push(Vec::with_capacity(self.columns.len()));
        Ok(())
    }

    /// Fill the next cell of the current row. `column` must be the column
    /// right after the last filled one.
    pub fn set_cell(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        if self.finished {
            return Err(ModelError::Finished {
                dataset: self.name.clone(),
            });
        }
        let index = self
            .column_index(column)
            .ok_or_else(|| ModelError::UnknownColumn {
                dataset: self.name.clone(),
                column: column.to_string(),
            })?;
        let Some(row) = self.rows.last_mut() else {
            return Err(ModelError::NoOpenRow {
                dataset: self.name.clone(),
            });
        };
        if index != row.len() {
            return Err(ModelError::CellOutOfOrder {
                dataset: self.name.clone(),
                column: column.to_string(),
                expected_index: row.len(),
            });
        }
        row.push(value.into());
        Ok(())
    }

    /// Close the dataset for structural changes and rewind the cursor.
    ///
    /// Locks the columns if that has not happened yet. Fails when the last
    /// row is still missing cells.
    pub fn mark_finished(&mut self) -> Result<()> {
        self.ensure_last_row_complete()?;
        self.column_state = ColumnState::Locked;
        self.finished = true;
        self.cursor = 0;
        Ok(())
    }

    fn ensure_last_row_complete(&self) -> Result<()> {
        match self.rows.last() {
            Some(row) if row.len() != self.columns.len() => Err(ModelError::IncompleteRow {
                dataset: self.name.clone(),
                row: self.rows.len() - 1,
                expected: self.columns.len(),
                actual: row.len(),
            }),
            _ => Ok(()),
        }
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.rows.len()
    }

    /// Copy of the row under the cursor, advancing it. `None` past the end.
    pub fn next_row(&mut self) -> Option<Vec<String>> {
        let row = self.rows.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(row)
    }

    /// A forward cursor over the rows, independent of [`Dataset::next_row`].
    pub fn rows(&self) -> RowCursor<'_> {
        RowCursor {
            rows: &self.rows,
            position: 0,
        }
    }

    /// Value of `column` in `row`, if the column exists.
    pub fn cell<'r>(&self, row: &'r [String], column: &str) -> Option<&'r str> {
        self.column_index(column)
            .and_then(|index| row.get(index))
            .map(String::as_str)
    }

    /// Replace the exported column subset. Every name must be a column.
    pub fn set_export_columns<I, S>(&mut self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if let Some(unknown) = columns.iter().find(|c| !self.has_column(c)) {
            return Err(ModelError::UnknownColumn {
                dataset: self.name.clone(),
                column: unknown.clone(),
            });
        }
        self.export_columns = Some(columns);
        Ok(())
    }

    /// Exported columns; all columns when no subset was configured.
    pub fn export_columns(&self) -> &[String] {
        self.export_columns.as_deref().unwrap_or(&self.columns)
    }

    pub fn is_exported(&self, column: &str) -> bool {
        self.export_columns().iter().any(|c| c == column)
    }

    pub fn set_row_key_column(&mut self, column: &str) -> Result<()> {
        if !self.has_column(column) {
            return Err(ModelError::UnknownColumn {
                dataset: self.name.clone(),
                column: column.to_string(),
            });
        }
        self.row_key_column = Some(column.to_string());
        Ok(())
    }

    pub fn row_key_column(&self) -> Option<&str> {
        self.row_key_column.as_deref()
    }

    /// Append a link. Duplicates are kept; lookups use the first match.
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// First link declared from `column`.
    pub fn find_link_from(&self, column: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.source_column() == column)
    }

    /// A finished copy holding only the rows whose `column` equals `value`,
    /// in their original order.
    pub fn filtered_copy(&self, column: &str, value: &str) -> Result<Dataset> {
        let index = self.require_column(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| row.get(index).is_some_and(|cell| cell == value))
            .cloned()
            .collect();
        Ok(Dataset {
            name: self.name.clone(),
            columns: self.columns.clone(),
            column_state: ColumnState::Locked,
            rows,
            finished: true,
            cursor: 0,
            export_columns: self.export_columns.clone(),
            row_key_column: self.row_key_column.clone(),
            links: self.links.clone(),
        })
    }

    /// Whether [`Dataset::filtered_copy`] would keep at least one row.
    pub fn has_match(&self, column: &str, value: &str) -> Result<bool> {
        let index = self.require_column(column)?;
        Ok(self
            .rows
            .iter()
            .any(|row| row.get(index).is_some_and(|cell| cell == value)))
    }

    fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| ModelError::UnknownColumn {
                dataset: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Human-readable dump: header, columns, then every `every`-th row.
    pub fn preview(&self, every: usize) -> String {
        let every = every.max(1);
        let mut out = format!("### {} ###", self.name);
        if every > 1 {
            out.push_str(&format!(" (every {every} rows)"));
        }
        out.push('\n');
        out.push_str(&self.columns.join(" - "));
        out.push('\n');
        for row in self.rows.iter().step_by(every) {
            out.push_str(&row.join(" - "));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview(1))
    }
}

/// Forward-only iterator over the rows of a [`Dataset`].
#[derive(Debug, Clone)]
pub struct RowCursor<'a> {
    rows: &'a [Vec<String>],
    position: usize,
}

impl<'a> Iterator for RowCursor<'a> {
    type Item = &'a [String];

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.get(self.position)?;
        self.position += 1;
        Some(row.as_slice())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowCursor<'_> {}
