use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabnest_model::DatasetCollection;

/// One line per dataset: name, column and row counts, column names.
pub fn dataset_table(collection: &DatasetCollection) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Columns"),
        header_cell("Rows"),
        header_cell("Column names"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for dataset in collection.datasets() {
        let rows = if dataset.is_empty() {
            dim_cell(0)
        } else {
            Cell::new(dataset.row_count())
        };
        table.add_row(vec![
            Cell::new(dataset.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(dataset.columns().len()),
            rows,
            Cell::new(dataset.columns().join(", ")),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
