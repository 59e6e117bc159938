//! Export plan loading and application against ingested directories.

use std::fs;
use std::path::Path;

use tabnest_cli::plan::{ExportPlan, PlanError};
use tabnest_ingest::{ReadOptions, read_directory};
use tabnest_model::{DatasetCollection, LinkKind, RowName};
use tabnest_output::NestedXmlWriter;
use tempfile::TempDir;

const TRIPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<table>
  <row><trip_id>t1</trip_id><route_id>r1</route_id><service_id>weekday</service_id></row>
  <row><trip_id>t2</trip_id><route_id>r2</route_id><service_id>sunday</service_id></row>
</table>
"#;

const ROUTES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<table>
  <row><route_id>r1</route_id><name>Red</name></row>
  <row><route_id>r2</route_id><name>Blue</name></row>
</table>
"#;

const PLAN: &str = r##"
root_tag = "services"
starting_dataset = "trips.txt"

[[dataset]]
name = "trips.txt"
row_key = "service_id"

[[dataset]]
name = "routes.txt"
export = ["name"]

[[link]]
from = "trips.txt"
column = "route_id"
to = "routes.txt"
to_column = "route_id"
row_name = "#NO#PRINT#"
"##;

fn input_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("trips.txt"), TRIPS).unwrap();
    fs::write(dir.path().join("routes.txt"), ROUTES).unwrap();
    dir
}

fn write_plan(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("plan.toml");
    fs::write(&path, contents).unwrap();
    path
}

fn collection(dir: &TempDir) -> DatasetCollection {
    read_directory(dir.path(), &ReadOptions::default()).unwrap()
}

#[test]
fn plan_configures_collection() {
    let input = input_dir();
    let plans = TempDir::new().unwrap();
    let plan = ExportPlan::load(&write_plan(plans.path(), PLAN)).unwrap();
    let mut collection = collection(&input);

    plan.apply(&mut collection).unwrap();

    assert_eq!(collection.starting_dataset_name(), Some("trips.txt"));
    let trips = collection.get_dataset("trips.txt").unwrap();
    assert_eq!(trips.row_key_column(), Some("service_id"));
    let link = trips.find_link_from("route_id").unwrap();
    assert_eq!(link.destination_dataset(), "routes.txt");
    assert_eq!(link.row_name(), &RowName::Suppressed);
    assert_eq!(link.kind(), LinkKind::Join);
    let routes = collection.get_dataset("routes.txt").unwrap();
    assert_eq!(routes.export_columns(), ["name"]);
}

#[test]
fn planned_export_nests_routes_under_trips() {
    let input = input_dir();
    let out = TempDir::new().unwrap();
    let plan = ExportPlan::load(&write_plan(out.path(), PLAN)).unwrap();
    let mut collection = collection(&input);
    plan.apply(&mut collection).unwrap();

    let output = out.path().join("services.xml");
    NestedXmlWriter::new(&collection)
        .with_naming(plan.naming())
        .write_file(&output, &plan.root_tag)
        .unwrap();

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<services>"));
    assert!(xml.contains(r#"<service id="weekday">"#));
    assert!(xml.contains(r#"<route id="r2">"#));
    assert!(xml.contains(r#"<name value="Blue">"#));
    assert!(!xml.contains("<row"));
    assert!(!xml.contains("#NO#PRINT#"));
}

#[test]
fn rejected_link_names_the_entry() {
    let input = input_dir();
    let mut collection = collection(&input);
    let plan: ExportPlan = r#"
        starting_dataset = "trips.txt"

        [[link]]
        from = "trips.txt"
        column = "route_id"
        to = "routes.txt"
        to_column = "route_code"
    "#
    .parse()
    .unwrap();

    let err = plan.apply(&mut collection).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"link trips.txt.route_id -> routes.txt.route_code rejected: unknown column route_code in routes.txt"
    );
    assert_eq!(collection.starting_dataset_name(), None);
}

#[test]
fn rejected_dataset_entry() {
    let input = input_dir();
    let mut collection = collection(&input);
    let plan: ExportPlan = r#"
        starting_dataset = "trips.txt"

        [[dataset]]
        name = "stops.txt"
        row_key = "stop_id"
    "#
    .parse()
    .unwrap();

    let err = plan.apply(&mut collection).unwrap_err();
    assert!(matches!(err, PlanError::Dataset { ref name, .. } if name == "stops.txt"));
}

#[test]
fn unknown_starting_dataset() {
    let input = input_dir();
    let mut collection = collection(&input);
    let plan: ExportPlan = r#"starting_dataset = "calendar.txt""#.parse().unwrap();

    let err = plan.apply(&mut collection).unwrap_err();
    assert!(matches!(err, PlanError::StartingDataset { ref name, .. } if name == "calendar.txt"));
}

#[test]
fn load_errors_carry_the_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    let err = ExportPlan::load(&missing).unwrap_err();
    assert!(matches!(err, PlanError::Io { ref path, .. } if path == &missing));

    let broken = write_plan(dir.path(), "starting_dataset = ");
    let err = ExportPlan::load(&broken).unwrap_err();
    assert!(matches!(err, PlanError::Toml { ref path, .. } if path == &broken));
}

#[test]
fn custom_naming_from_plan() {
    let plan: ExportPlan = r#"
        starting_dataset = "trips.txt"

        [naming]
        default_row_tag = "entry"
    "#
    .parse()
    .unwrap();

    let naming = plan.naming();
    assert_eq!(naming.default_row_tag, "entry");
    assert_eq!(naming.primary_attribute, "id");
    assert_eq!(naming.alternate_attribute, "value");
}
