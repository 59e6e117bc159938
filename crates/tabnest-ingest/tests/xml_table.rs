//! Tests for reading tabular XML files.

use std::fs;
use std::path::Path;

use tabnest_ingest::{IngestError, ReadOptions, read_directory, read_table_file, read_table_str};
use tabnest_model::ModelError;

const ROUTES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<table>
  <row>
    <route_id>r1</route_id>
    <name> Red &amp; White </name>
  </row>
  <row>
    <route_id>r2</route_id>
    <name/>
  </row>
</table>
"#;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write table file");
}

#[test]
fn reads_columns_from_first_row() {
    let mut dataset = read_table_str("routes.txt", ROUTES, &ReadOptions::default()).unwrap();

    assert_eq!(dataset.name(), "routes.txt");
    assert_eq!(dataset.columns(), ["route_id", "name"]);
    assert!(dataset.is_locked());
    assert!(dataset.is_finished());
    assert_eq!(
        dataset.next_row(),
        Some(vec!["r1".to_string(), "Red & White".to_string()])
    );
    assert_eq!(
        dataset.next_row(),
        Some(vec!["r2".to_string(), String::new()])
    );
    assert!(!dataset.has_next());
}

#[test]
fn open_and_close_tags_without_text_are_empty_cells() {
    let xml = "<table><row><a>1</a><b></b></row><row><a> </a><b>2</b></row></table>";
    let dataset = read_table_str("t", xml, &ReadOptions::default()).unwrap();
    let rows: Vec<_> = dataset.rows().collect();
    assert_eq!(rows[0], ["1", ""]);
    assert_eq!(rows[1], ["", "2"]);
}

#[test]
fn empty_table_has_no_columns() {
    let dataset = read_table_str("t", "<table/>", &ReadOptions::default()).unwrap();
    assert!(dataset.columns().is_empty());
    assert!(dataset.is_empty());
    assert!(dataset.is_finished());
}

#[test]
fn later_row_with_new_column_fails() {
    let xml = "<table><row><a>1</a></row><row><a>2</a><b>3</b></row></table>";
    let err = read_table_str("t", xml, &ReadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Shape {
            row: 2,
            source: ModelError::UnknownColumn { .. },
            ..
        }
    ));
}

#[test]
fn later_row_with_missing_column_fails() {
    let xml = "<table><row><a>1</a><b>2</b></row><row><a>3</a></row><row><a>4</a><b>5</b></row></table>";
    let err = read_table_str("t", xml, &ReadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Shape {
            source: ModelError::IncompleteRow { .. },
            ..
        }
    ));

    let trailing = "<table><row><a>1</a><b>2</b></row><row><a>3</a></row></table>";
    assert!(read_table_str("t", trailing, &ReadOptions::default()).is_err());
}

#[test]
fn reordered_columns_fail() {
    let xml = "<table><row><a>1</a><b>2</b></row><row><b>3</b><a>4</a></row></table>";
    let err = read_table_str("t", xml, &ReadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Shape {
            source: ModelError::CellOutOfOrder { .. },
            ..
        }
    ));
}

#[test]
fn unexpected_layout_is_rejected() {
    let options = ReadOptions::default();
    assert!(matches!(
        read_table_str("t", "<rows><row/></rows>", &options),
        Err(IngestError::UnexpectedElement { .. })
    ));
    assert!(matches!(
        read_table_str("t", "<table><record/></table>", &options),
        Err(IngestError::UnexpectedElement { .. })
    ));
    assert!(matches!(
        read_table_str("t", "<table><row><a><b/></a></row></table>", &options),
        Err(IngestError::UnexpectedElement { .. })
    ));
}

#[test]
fn unterminated_table_is_truncated() {
    let err = read_table_str("t", "<table><row><a>1</a></row>", &ReadOptions::default());
    assert!(err.is_err());
    let err = read_table_str("t", "", &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Truncated { .. }));
}

#[test]
fn custom_tags_are_honored() {
    let options = ReadOptions {
        table_tag: "data".to_string(),
        row_tag: "record".to_string(),
    };
    let xml = "<data><record><x>1</x></record></data>";
    let dataset = read_table_str("t", xml, &options).unwrap();
    assert_eq!(dataset.row_count(), 1);
}

#[test]
fn reads_file_named_after_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "routes.txt", ROUTES);

    let dataset = read_table_file(&dir.path().join("routes.txt"), &ReadOptions::default()).unwrap();
    assert_eq!(dataset.name(), "routes.txt");
    assert_eq!(dataset.row_count(), 2);

    let missing = read_table_file(&dir.path().join("stops.txt"), &ReadOptions::default());
    assert!(matches!(missing, Err(IngestError::FileRead { .. })));
}

#[test]
fn reads_whole_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "routes.txt", ROUTES);
    write(
        dir.path(),
        "trips.txt",
        "<table><row><trip_id>t1</trip_id><route_id>r1</route_id></row></table>",
    );

    let collection = read_directory(dir.path(), &ReadOptions::default()).unwrap();
    assert_eq!(collection.dataset_names(), ["routes.txt", "trips.txt"]);
    assert_eq!(collection.get_dataset("trips.txt").unwrap().row_count(), 1);
}

#[test]
fn directory_read_stops_at_first_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "<table><row><x>1</x></row></table>");
    write(
        dir.path(),
        "b.txt",
        "<table><row><x>1</x></row><row><y>2</y></row></table>",
    );
    write(dir.path(), "c.txt", "<table/>");

    let err = read_directory(dir.path(), &ReadOptions::default()).unwrap_err();
    match err {
        IngestError::Shape { path, row, .. } => {
            assert!(path.ends_with("b.txt"));
            assert_eq!(row, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}
