use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use trackgen_build::{Capability, Generator};

use crate::context::{GenerateOverrides, ProjectContext, ResolvedGenerate};
use crate::help::ExampleGroup;
use crate::output::{Console, Status};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Generate",
        commands: &[
            "trackgen generate                              # Use trackgen.toml or src/",
            "trackgen generate --package src/models         # Scan one package",
            "trackgen generate --types diff                 # Only the diff routines",
        ],
    },
    ExampleGroup {
        title: "Output",
        commands: &[
            "trackgen generate --output src/generated       # Write outside the package",
            "trackgen generate --runtime-crate crate::rt    # Runtime re-exported under another path",
            "trackgen generate --dry-run                    # Render without writing",
        ],
    },
];

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Package directory to scan (repeatable)
    #[arg(short = 'p', long = "package")]
    pub packages: Vec<PathBuf>,

    /// Comma-separated artifacts to produce: clone, diff
    #[arg(short = 't', long, value_delimiter = ',')]
    pub types: Vec<Capability>,

    /// Directory receiving the artifacts
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Path generated code uses to reach the runtime crate
    #[arg(long)]
    pub runtime_crate: Option<String>,

    /// Render everything but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct GenerateSummary {
    structs: usize,
    written: Vec<PathBuf>,
    unchanged: Vec<PathBuf>,
    warnings: Vec<String>,
    dry_run: bool,
}

pub fn handle_generate(args: GenerateArgs, console: &Console) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let dry_run = args.dry_run;
    let resolved = ctx.resolve(GenerateOverrides {
        packages: args.packages,
        types: args.types,
        output: args.output,
        runtime_crate: args.runtime_crate,
    })?;

    console.trace(&format!("project root: {}", ctx.project_root.display()));
    for package in &resolved.packages {
        console.trace(&format!("package: {}", package.display()));
    }

    let generator = build_generator(&resolved);
    let summary = if dry_run {
        let generation = generator.build().context("Generation failed")?;
        GenerateSummary {
            structs: generation.registry.len(),
            written: Vec::new(),
            unchanged: generation.artifacts.iter().map(|artifact| artifact.path.clone()).collect(),
            warnings: generation.warnings,
            dry_run,
        }
    } else {
        let report = generator.run().context("Generation failed")?;
        GenerateSummary {
            structs: report.structs,
            written: report.written,
            unchanged: report.unchanged,
            warnings: report.warnings,
            dry_run,
        }
    };

    if console.is_json() {
        return console.json(&summary);
    }

    for warning in &summary.warnings {
        console.status(Status::Warning, warning);
    }
    if summary.structs == 0 {
        return Ok(());
    }

    console.title(&format!("{} struct(s) processed", summary.structs));
    for path in &summary.written {
        console.item(Status::Written, &display_path(&ctx.project_root, path));
    }
    for path in &summary.unchanged {
        console.item(Status::Unchanged, &display_path(&ctx.project_root, path));
    }

    if dry_run {
        console.status(Status::Note, "Dry run: nothing was written");
    } else if summary.written.is_empty() {
        console.status(Status::Written, "Artifacts are up to date");
    } else {
        console.status(Status::Written, &format!("Wrote {} artifact(s)", summary.written.len()));
    }
    Ok(())
}

fn build_generator(resolved: &ResolvedGenerate) -> Generator {
    let mut generator = trackgen_build::generate()
        .capabilities(resolved.types.iter().copied())
        .runtime_crate(resolved.runtime_crate.clone());
    for package in &resolved.packages {
        generator = generator.package(package);
    }
    if let Some(dir) = &resolved.output {
        generator = generator.output_dir(dir);
    }
    generator
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
