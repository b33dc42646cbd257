use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use trackgen_build::{Category, FieldSlots, Registry, StructSchema, StructSlots, build_registry};

use crate::context::{GenerateOverrides, ProjectContext};
use crate::help::ExampleGroup;
use crate::output::{Console, Status};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Inspect",
    commands: &[
        "trackgen inspect                               # Show every struct and field category",
        "trackgen inspect --package src/models          # Inspect one package",
        "trackgen --format json inspect                 # Machine-readable output",
    ],
}];

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Package directory to scan (repeatable)
    #[arg(short = 'p', long = "package")]
    pub packages: Vec<PathBuf>,

    /// Only show this struct
    #[arg(long = "struct")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct StructReport {
    name: String,
    package: String,
    embedded: bool,
    fields: Vec<FieldReport>,
}

#[derive(Debug, Serialize)]
struct FieldReport {
    name: String,
    signature: String,
    category: String,
    #[serde(skip)]
    kind: Category,
    key: String,
    column: String,
    copy: &'static str,
    needs_review: bool,
}

impl StructReport {
    fn new(schema: &StructSchema) -> Result<Self> {
        let slots = StructSlots::new(schema)?;
        Ok(Self {
            name: schema.name.clone(),
            package: schema.package.clone(),
            embedded: schema.is_embedded_document,
            fields: slots
                .fields
                .iter()
                .map(|field| FieldReport {
                    name: field.name().to_string(),
                    signature: field.signature().to_string(),
                    category: field.category().label().to_string(),
                    kind: field.category(),
                    key: field.schema.serialization_key.clone(),
                    column: field.schema.column.clone(),
                    copy: copy_strategy(field),
                    needs_review: field.needs_review(),
                })
                .collect(),
        })
    }
}

/// How `deep_clone` treats the field.
fn copy_strategy(field: &FieldSlots<'_>) -> &'static str {
    if field.is_collection_of_nested_refs() {
        "per element, absent kept"
    } else if field.is_collection_of_nested() {
        "per element"
    } else if field.is_mapping_of_nested() {
        "per value"
    } else if field.shape().requires_deep_copy() {
        "recursive"
    } else {
        "clone"
    }
}

pub fn handle_inspect(args: InspectArgs, console: &Console) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let resolved = ctx.resolve(GenerateOverrides {
        packages: args.packages,
        ..Default::default()
    })?;

    let mut generator = trackgen_build::generate();
    for package in &resolved.packages {
        generator = generator.package(package);
    }
    let units = generator.load_units().context("Failed to load sources")?;
    let registry = build_registry(&units).context("Failed to build struct registry")?;

    let reports = collect_reports(&registry, args.name.as_deref())?;
    if console.is_json() {
        return console.json(&reports);
    }

    if reports.is_empty() {
        match args.name {
            Some(name) => console.status(Status::Warning, &format!("No struct named {name} found")),
            None => console.status(Status::Warning, "No structs found"),
        }
        return Ok(());
    }

    for report in &reports {
        let title = if report.embedded {
            format!("{} (embedded document)", report.name)
        } else {
            report.name.clone()
        };
        console.title(&title);

        let mut table = console.grid(&["Field", "Type", "Category", "Key", "Column", "Copy", "Review"]);
        for field in &report.fields {
            table.add_row(vec![
                Cell::new(&field.name),
                Cell::new(&field.signature),
                console.category_cell(field.kind),
                Cell::new(&field.key),
                Cell::new(&field.column),
                Cell::new(field.copy),
                Cell::new(if field.needs_review { "yes" } else { "" }),
            ]);
        }
        console.show(&table);
    }

    let review: usize = reports
        .iter()
        .map(|report| report.fields.iter().filter(|field| field.needs_review).count())
        .sum();
    if review > 0 {
        console.status(Status::Warning, &format!("{review} field(s) need manual review"));
    }
    Ok(())
}

fn collect_reports(registry: &Registry, name: Option<&str>) -> Result<Vec<StructReport>> {
    registry
        .structs()
        .iter()
        .filter(|schema| name.is_none_or(|name| schema.name == name))
        .map(StructReport::new)
        .collect()
}
