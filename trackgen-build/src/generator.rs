//! Generation driver: load units, build the registry, render and write artifacts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::clone_gen::synthesize_clone;
use crate::diff_gen::synthesize_diff;
use crate::errors::{GenerateError, GenerateResult};
use crate::registry::{Registry, build_registry};
use crate::source::{SourceUnit, load_package};
use crate::template::{ArtifactTemplate, Capability};

/// Builder for configuring and running the generator.
#[derive(Debug, Clone)]
pub struct Generator {
    packages: Vec<PathBuf>,
    files: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    capabilities: Vec<Capability>,
    runtime_crate: String,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            packages: Vec::new(),
            files: Vec::new(),
            output_dir: None,
            capabilities: Capability::ALL.to_vec(),
            runtime_crate: "trackgen".to_string(),
        }
    }

    /// Add a package directory. Only the `.rs` files directly inside it are scanned.
    ///
    /// Can be called multiple times. Default: `src/` when neither packages nor files are given.
    pub fn package(mut self, dir: impl Into<PathBuf>) -> Self {
        self.packages.push(dir.into());
        self
    }

    /// Add a single source file; it belongs to the package of its parent directory.
    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Directory receiving `clone.rs`/`diff.rs`.
    ///
    /// Default: next to the package sources. With several packages each one gets a
    /// subdirectory named after the package directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Restrict the artifacts produced. Default: clone and diff.
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        let mut capabilities: Vec<Capability> = capabilities.into_iter().collect();
        capabilities.sort();
        capabilities.dedup();
        self.capabilities = capabilities;
        self
    }

    /// Path generated code uses to reach the runtime crate.
    ///
    /// Default: `trackgen`
    pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Read every configured unit, in package order then file order.
    pub fn load_units(&self) -> GenerateResult<Vec<SourceUnit>> {
        let packages = if self.packages.is_empty() && self.files.is_empty() {
            vec![PathBuf::from("src/")]
        } else {
            self.packages.clone()
        };

        let mut units = Vec::new();
        for dir in &packages {
            units.extend(load_package(dir)?);
        }
        for path in &self.files {
            units.push(SourceUnit::read(path)?);
        }

        // the same file may be reachable through a package and explicitly
        let mut seen = HashSet::new();
        units.retain(|unit| seen.insert(unit.name.clone()));
        Ok(units)
    }

    /// Run the whole pipeline in memory.
    pub fn build(&self) -> GenerateResult<Generation> {
        let units = self.load_units()?;
        let registry = build_registry(&units)?;
        let mut warnings = Vec::new();
        let mut artifacts = Vec::new();

        if registry.is_empty() {
            let warning = format!("no structs found in {} source unit(s)", units.len());
            log::warn!("{warning}");
            warnings.push(warning);
            return Ok(Generation {
                registry,
                artifacts,
                warnings,
            });
        }

        let packages = registry.packages();
        let shared_output = packages.len() > 1;
        for package in &packages {
            for capability in &self.capabilities {
                let template = ArtifactTemplate::new(*capability, &self.runtime_crate)?;
                let (contents, structs) = render_package(&registry, package, &template)?;
                artifacts.push(Artifact {
                    package: package.to_string(),
                    capability: *capability,
                    path: self.destination(package, *capability, shared_output),
                    contents,
                    structs,
                });
            }
        }

        Ok(Generation {
            registry,
            artifacts,
            warnings,
        })
    }

    /// Build, then write every artifact whose content changed.
    ///
    /// Nothing is written unless every artifact rendered.
    pub fn run(self) -> GenerateResult<Report> {
        let generation = self.build()?;
        let mut report = Report {
            structs: generation.registry.len(),
            warnings: generation.warnings,
            ..Report::default()
        };

        for artifact in &generation.artifacts {
            if write_if_changed(&artifact.path, &artifact.contents)? {
                log::info!(
                    "generated {} ({} structs, {})",
                    artifact.path.display(),
                    artifact.structs,
                    artifact.capability
                );
                report.written.push(artifact.path.clone());
            } else {
                log::debug!("{} is up to date", artifact.path.display());
                report.unchanged.push(artifact.path.clone());
            }
        }

        Ok(report)
    }

    fn destination(&self, package: &str, capability: Capability, shared_output: bool) -> PathBuf {
        let package_dir = Path::new(package);
        let dir = match &self.output_dir {
            Some(out) if shared_output => match package_dir.file_name() {
                Some(name) => out.join(name),
                None => out.clone(),
            },
            Some(out) => out.clone(),
            None => package_dir.to_path_buf(),
        };
        dir.join(capability.file_name())
    }
}

/// Result of [`Generator::build`].
#[derive(Debug)]
pub struct Generation {
    pub registry: Registry,
    pub artifacts: Vec<Artifact>,
    pub warnings: Vec<String>,
}

/// One rendered output file.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub package: String,
    pub capability: Capability,
    pub path: PathBuf,
    pub contents: String,
    /// Number of structs with a routine in this artifact.
    pub structs: usize,
}

/// Result of [`Generator::run`].
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub structs: usize,
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Render one capability for one package: imports plus one routine per struct, first-seen order.
/// Struct names are unique in the registry, so every struct yields exactly one routine.
pub fn render_package(registry: &Registry, package: &str, template: &ArtifactTemplate) -> GenerateResult<(String, usize)> {
    let mut structs = Vec::new();
    let mut items = Vec::new();

    for schema in registry.structs_in(package) {
        let item = match template.capability() {
            Capability::Clone => synthesize_clone(schema, template)?,
            Capability::Diff => synthesize_diff(schema, template)?,
        };
        structs.push(schema);
        items.push(item);
    }

    let imports = template.imports(&structs)?;
    Ok((template.render(imports, &items), structs.len()))
}

/// Returns whether the file was (re)written.
fn write_if_changed(path: &Path, contents: &str) -> GenerateResult<bool> {
    // Only write if content has changed (avoids unnecessary recompilation)
    let should_write = match fs::read_to_string(path) {
        Ok(existing) => existing != contents,
        Err(_) => true,
    };
    if !should_write {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}
