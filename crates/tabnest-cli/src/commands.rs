use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span};

use tabnest_cli::plan::ExportPlan;
use tabnest_ingest::{ReadOptions, read_directory};
use tabnest_model::DatasetCollection;
use tabnest_output::NestedXmlWriter;

use crate::cli::{ExportArgs, InspectArgs};
use crate::summary::dataset_table;

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let collection = read_input(&args.input_dir, &args.read.options())?;
    match &args.dataset {
        Some(name) => {
            let dataset = collection.get_dataset(name).ok_or_else(|| {
                anyhow!("no dataset named {name} in {}", args.input_dir.display())
            })?;
            print!("{}", dataset.preview(args.every));
        }
        None => println!("{}", dataset_table(&collection)),
    }
    Ok(())
}

pub fn run_export(args: &ExportArgs) -> Result<PathBuf> {
    let output = &args.output;
    if output.file_name().is_none() {
        bail!("output file name must not be empty");
    }
    let export_span = info_span!("export", output = %output.display());
    let _export_guard = export_span.enter();
    let start = Instant::now();

    let plan = ExportPlan::load(&args.plan).context("load export plan")?;
    let mut collection = read_input(&args.input_dir, &args.read.options())?;
    plan.apply(&mut collection).context("apply export plan")?;

    let root_tag = args.root_tag.as_deref().unwrap_or(&plan.root_tag);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    NestedXmlWriter::new(&collection)
        .with_naming(plan.naming())
        .write_file(output, root_tag)
        .with_context(|| format!("write {}", output.display()))?;

    info!(
        root_tag,
        datasets = collection.len(),
        duration_ms = start.elapsed().as_millis(),
        "export complete"
    );
    Ok(output.clone())
}

fn read_input(dir: &Path, options: &ReadOptions) -> Result<DatasetCollection> {
    read_directory(dir, options).with_context(|| format!("read {}", dir.display()))
}
