//! Build-time generator for deep-copy and change-diff routines.
//!
//! This crate scans a package of Rust sources for plain structs, classifies every field,
//! and writes two artifacts next to them (or into an output directory):
//!
//! - `clone.rs`: `impl trackgen::DeepClone` for every struct
//! - `diff.rs`: `impl trackgen::Diff` for every struct, producing minimal change sets with
//!   merge directives for document columns
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     let out_dir = std::env::var("OUT_DIR").unwrap();
//!     trackgen_build::generate()
//!         .package("src/models")
//!         .output_dir(out_dir)
//!         .run()
//!         .expect("Failed to generate trackgen routines");
//!
//!     println!("cargo:rerun-if-changed=src/models");
//! }
//! ```
//!
//! Then include the artifacts from a child module of the package:
//!
//! ```ignore
//! mod generated_clone {
//!     include!(concat!(env!("OUT_DIR"), "/clone.rs"));
//! }
//! ```

pub mod attrs;
mod classify;
mod clone_gen;
mod diff_gen;
mod errors;
mod generator;
mod registry;
mod schema;
mod signature;
mod source;
mod template;

pub use classify::Classifier;
pub use clone_gen::synthesize_clone;
pub use diff_gen::synthesize_diff;
pub use errors::{GenerateError, GenerateResult};
pub use generator::{Artifact, Generation, Generator, Report, render_package};
pub use registry::{Registry, build_registry};
pub use schema::{Category, FieldSchema, KnownTypes, Presence, StructSchema};
pub use signature::{SequenceKind, TypeShape, type_to_string};
pub use source::{GENERATED_FILE_NAMES, GENERATED_HEADER, SourceUnit, discover_package, load_package};
pub use template::{ArtifactTemplate, Capability, FieldSlots, StructSlots, format_tokens};

/// Create a new generator with default settings.
///
/// # Example
///
/// ```ignore
/// trackgen_build::generate()
///     .package("src/models")
///     .run()
///     .expect("Failed to generate trackgen routines");
/// ```
pub fn generate() -> Generator {
    Generator::new()
}

/// Render one capability for every package of an in-memory registry, in first-seen order.
///
/// Returns `(package, source)` pairs; an empty registry yields no artifacts.
pub fn synthesize(
    registry: &Registry,
    capability: Capability,
    runtime_crate: &str,
) -> GenerateResult<Vec<(String, String)>> {
    let template = ArtifactTemplate::new(capability, runtime_crate)?;
    registry
        .packages()
        .into_iter()
        .map(|package| {
            let (source, _) = render_package(registry, package, &template)?;
            Ok((package.to_string(), source))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_in_memory() {
        let units = vec![
            SourceUnit::inline("person.rs", "pub struct Person { pub name: String, pub pet: Option<Pet> }")
                .with_module("person"),
            SourceUnit::inline("pet.rs", "pub struct Pet { pub name: String }").with_module("pet"),
        ];
        let registry = build_registry(&units).unwrap();

        let artifacts = synthesize(&registry, Capability::Clone, "trackgen").unwrap();
        assert_eq!(artifacts.len(), 1);
        let (package, source) = &artifacts[0];
        assert_eq!(package, "");
        assert!(source.starts_with(GENERATED_HEADER));
        assert!(source.contains("// trackgen capability: clone"));
        assert!(source.contains("use super::person::Person;"));
        assert_eq!(source.matches("impl ::trackgen::DeepClone for").count(), 2);
    }

    #[test]
    fn test_synthesize_empty_registry() {
        let registry = build_registry(&[SourceUnit::inline("empty.rs", "fn main() {}")]).unwrap();
        assert!(synthesize(&registry, Capability::Diff, "trackgen").unwrap().is_empty());
    }
}
