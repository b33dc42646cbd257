//! Two-phase struct registry.
//!
//! Phase 1 parses every unit and records the declared struct names; phase 2 walks the parsed
//! units again and classifies fields against the complete name set. A final pass refines
//! categories once embedded-document membership is known.

use syn::ext::IdentExt;
use syn::{Fields, Item, ItemStruct};

use crate::attrs::{FieldTags, StructTags, raw_tag_text};
use crate::classify::Classifier;
use crate::errors::{GenerateError, GenerateResult};
use crate::schema::{FieldSchema, KnownTypes, StructSchema};
use crate::signature::{TypeShape, type_to_string};
use crate::source::SourceUnit;

/// Read-only result of a registry build.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    structs: Vec<StructSchema>,
    known: KnownTypes,
    embedded: KnownTypes,
}

impl Registry {
    /// Structs in first-seen order across units.
    pub fn structs(&self) -> &[StructSchema] {
        &self.structs
    }

    pub fn get(&self, name: &str) -> Option<&StructSchema> {
        self.structs.iter().find(|schema| schema.name == name)
    }

    pub fn known_types(&self) -> &KnownTypes {
        &self.known
    }

    pub fn embedded_documents(&self) -> &KnownTypes {
        &self.embedded
    }

    /// Package keys in first-seen order.
    pub fn packages(&self) -> Vec<&str> {
        let mut packages: Vec<&str> = Vec::new();
        for schema in &self.structs {
            if !packages.contains(&schema.package.as_str()) {
                packages.push(&schema.package);
            }
        }
        packages
    }

    pub fn structs_in<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a StructSchema> + 'a {
        self.structs.iter().filter(move |schema| schema.package == package)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

/// A struct that will get generated routines.
struct Declaration<'a> {
    unit: &'a SourceUnit,
    item: &'a ItemStruct,
    tags: StructTags,
}

/// Parse every unit and build the registry. Any unit that fails to parse aborts the batch.
pub fn build_registry(units: &[SourceUnit]) -> GenerateResult<Registry> {
    let mut parsed = Vec::with_capacity(units.len());
    for unit in units {
        let file = syn::parse_file(&unit.source).map_err(|err| GenerateError::parse(&unit.name, err))?;
        log::debug!("parsed {} ({} items)", unit.name, file.items.len());
        parsed.push((unit, file));
    }

    // Phase 1: names only.
    let mut known = KnownTypes::new();
    let mut declarations = Vec::new();
    for (unit, file) in &parsed {
        for item in &file.items {
            let Item::Struct(item) = item else {
                continue;
            };
            let tags = StructTags::from_attrs(&item.attrs).map_err(|err| GenerateError::parse(&unit.name, err))?;
            if !is_generatable(unit, item) {
                continue;
            }
            if tags.skip {
                log::debug!("{}: skipping {} (tracked(skip))", unit.name, item.ident);
                continue;
            }
            if !known.insert(item.ident.to_string()) {
                log::warn!("{}: duplicate struct {} ignored, first declaration wins", unit.name, item.ident);
                continue;
            }
            declarations.push(Declaration { unit: *unit, item, tags });
        }
    }

    // Phase 2: fields, classified against the complete name set.
    let classifier = Classifier::new(&known);
    let mut structs = Vec::with_capacity(declarations.len());
    for declaration in &declarations {
        structs.push(extract_struct(declaration, &known, &classifier)?);
    }

    let embedded: KnownTypes = structs
        .iter()
        .filter(|schema| schema.is_embedded_document)
        .map(|schema| schema.name.clone())
        .collect();

    for schema in &mut structs {
        let owner_embedded = schema.is_embedded_document;
        for field in &mut schema.fields {
            let refined = classifier.refine(owner_embedded, &field.shape, &field.tags, field.category);
            if refined != field.category {
                log::debug!(
                    "{}.{}: {} -> {} inside embedded document",
                    schema.name,
                    field.name,
                    field.category,
                    refined
                );
                field.category = refined;
            }
        }
    }

    Ok(Registry {
        structs,
        known,
        embedded,
    })
}

/// Named-field, non-generic structs only.
fn is_generatable(unit: &SourceUnit, item: &ItemStruct) -> bool {
    if !matches!(item.fields, Fields::Named(_)) {
        log::debug!("{}: skipping {} (no named fields)", unit.name, item.ident);
        return false;
    }
    if !item.generics.params.is_empty() {
        log::warn!("{}: skipping generic struct {}", unit.name, item.ident);
        return false;
    }
    true
}

fn extract_struct(
    declaration: &Declaration<'_>,
    known: &KnownTypes,
    classifier: &Classifier<'_>,
) -> GenerateResult<StructSchema> {
    let Declaration { unit, item, tags } = declaration;
    let mut fields = Vec::new();

    if let Fields::Named(named) = &item.fields {
        for field in &named.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let name = ident.unraw().to_string();
            let field_tags = FieldTags::from_attrs(&field.attrs).map_err(|err| GenerateError::parse(&unit.name, err))?;
            let shape = TypeShape::analyze(&field.ty, known);
            let category = classifier.classify(&shape, &field_tags);

            fields.push(FieldSchema {
                serialization_key: tags.serialization_key(&name, &field_tags),
                column: field_tags.column_for(&name),
                ident: ident.to_string(),
                signature: type_to_string(&field.ty),
                raw_tags: raw_tag_text(&field.attrs),
                name,
                shape,
                category,
                tags: field_tags,
            });
        }
    }

    log::debug!("{}: registered {} with {} fields", unit.name, item.ident, fields.len());

    Ok(StructSchema {
        name: item.ident.to_string(),
        package: unit.package.clone(),
        module: unit.module.clone(),
        fields,
        is_embedded_document: tags.embedded,
        serde_rename_all: tags.rename_all,
    })
}
