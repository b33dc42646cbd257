//! Source units and package discovery.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{GenerateError, GenerateResult};

/// Header written at the top of every generated artifact. Units starting with it are skipped.
pub const GENERATED_HEADER: &str = "// Code generated by trackgen. DO NOT EDIT.";

/// File names of generated artifacts, never scanned as input.
pub const GENERATED_FILE_NAMES: &[&str] = &["clone.rs", "diff.rs"];

/// One parsed-on-demand source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Display name used in error messages (usually the file path).
    pub name: String,
    /// Package key: the directory the unit belongs to.
    pub package: String,
    /// Module name relative to the package, `None` for `mod.rs`/`lib.rs`/`main.rs`.
    pub module: Option<String>,
    pub source: String,
}

impl SourceUnit {
    /// A unit that is not backed by a file; its structs are imported from the package root.
    pub fn inline(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: String::new(),
            module: None,
            source: source.into(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Read a unit from disk; its package is its parent directory.
    pub fn read(path: &Path) -> GenerateResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let package = path
            .parent()
            .map(|parent| parent.display().to_string())
            .unwrap_or_default();

        Ok(Self {
            name: path.display().to_string(),
            package,
            module: module_name(path),
            source,
        })
    }

    pub fn is_generated(&self) -> bool {
        self.source.trim_start().starts_with(GENERATED_HEADER)
    }
}

/// Collect the `.rs` files directly inside a package directory, sorted by file name.
///
/// Generated artifacts and hidden files are skipped; subdirectories are separate packages.
pub fn discover_package(dir: &Path) -> GenerateResult<Vec<PathBuf>> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_candidate(path))
        .collect();

    if files.is_empty() {
        return Err(GenerateError::NoSourceUnits { path: dir.to_path_buf() });
    }

    Ok(files)
}

/// Load every candidate unit of a package, dropping files that carry the generated header.
pub fn load_package(dir: &Path) -> GenerateResult<Vec<SourceUnit>> {
    let mut units = Vec::new();
    for path in discover_package(dir)? {
        let unit = SourceUnit::read(&path)?;
        if unit.is_generated() {
            log::debug!("skipping generated unit {}", unit.name);
            continue;
        }
        units.push(unit);
    }
    Ok(units)
}

fn is_candidate(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    path.extension().is_some_and(|ext| ext == "rs")
        && !file_name.starts_with('.')
        && !GENERATED_FILE_NAMES.contains(&file_name)
}

/// `models/user.rs` → `user`; `mod.rs`, `lib.rs` and `main.rs` are the package root.
fn module_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if matches!(stem, "mod" | "lib" | "main") {
        None
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name() {
        assert_eq!(module_name(Path::new("src/models/user.rs")), Some("user".to_string()));
        assert_eq!(module_name(Path::new("src/models/mod.rs")), None);
        assert_eq!(module_name(Path::new("src/lib.rs")), None);
    }

    #[test]
    fn test_discover_package_skips_generated_and_nested() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.rs"), "pub struct B { pub x: u8 }").unwrap();
        fs::write(dir.path().join("a.rs"), "pub struct A { pub x: u8 }").unwrap();
        fs::write(dir.path().join("clone.rs"), "// old output").unwrap();
        fs::write(dir.path().join("notes.txt"), "not rust").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.rs"), "pub struct C;").unwrap();

        let files = discover_package(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.rs", "b.rs"]);
    }

    #[test]
    fn test_load_package_drops_units_with_generated_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.rs"), "pub struct A { pub x: u8 }").unwrap();
        fs::write(dir.path().join("custom_out.rs"), format!("{GENERATED_HEADER}\nimpl A {{}}")).unwrap();

        let units = load_package(dir.path()).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].module.as_deref(), Some("model"));
        assert_eq!(units[0].package, dir.path().display().to_string());
    }

    #[test]
    fn test_empty_package_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_package(dir.path()).unwrap_err();
        assert!(matches!(err, GenerateError::NoSourceUnits { .. }));
    }
}
