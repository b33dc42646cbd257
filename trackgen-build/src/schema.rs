//! In-memory schema model built once per generation run.

use std::collections::BTreeSet;
use std::fmt;

use crate::attrs::{FieldTags, RenameRule};
use crate::signature::TypeShape;

/// Whether a field is wrapped in `Option`, i.e. may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Required,
    Optional,
}

impl Presence {
    pub fn is_optional(self) -> bool {
        matches!(self, Presence::Optional)
    }
}

/// Semantic category deciding how a field is cloned and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Value-copyable scalar, or a relationship that must not be traversed.
    Primitive,
    /// Another declared struct, held by value or `Box`.
    NestedDocument,
    /// Another declared struct behind `Option`.
    NestedDocumentRef,
    /// Sequence (`Vec`, `VecDeque`, sets, arrays).
    Collection,
    /// Key/value mapping.
    Association,
    /// Untyped value (`serde_json::Value`, trait objects).
    DynamicValue,
    /// Column persisted as a serialized document; diffs become merge directives.
    SerializedDocument,
    Temporal(Presence),
    UniqueIdentifier(Presence),
    SoftDeleteMarker(Presence),
    /// Shared or optional reference assumed to be `==`-comparable.
    ComparableReference,
    /// Unclassifiable; copied shallowly and flagged for review.
    Opaque,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Primitive => "primitive",
            Category::NestedDocument => "nested",
            Category::NestedDocumentRef => "nested-ref",
            Category::Collection => "collection",
            Category::Association => "association",
            Category::DynamicValue => "dynamic",
            Category::SerializedDocument => "document",
            Category::Temporal(Presence::Required) => "temporal",
            Category::Temporal(Presence::Optional) => "temporal?",
            Category::UniqueIdentifier(Presence::Required) => "uuid",
            Category::UniqueIdentifier(Presence::Optional) => "uuid?",
            Category::SoftDeleteMarker(Presence::Required) => "soft-delete",
            Category::SoftDeleteMarker(Presence::Optional) => "soft-delete?",
            Category::ComparableReference => "comparable",
            Category::Opaque => "opaque",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single named field of a scanned struct.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Field name without any `r#` prefix.
    pub name: String,
    /// Identifier as written in source (keeps `r#` for raw identifiers).
    pub ident: String,
    /// Human-readable type signature, e.g. `Option<Box<Person>>`.
    pub signature: String,
    pub shape: TypeShape,
    pub category: Category,
    /// Key used in diff output.
    pub serialization_key: String,
    /// Storage column for merge directives.
    pub column: String,
    /// The `#[tracked]`/`#[serde]` attributes as written.
    pub raw_tags: String,
    pub tags: FieldTags,
}

impl FieldSchema {
    pub fn needs_review(&self) -> bool {
        self.category == Category::Opaque
    }
}

/// A scanned struct declaration.
#[derive(Debug, Clone)]
pub struct StructSchema {
    pub name: String,
    /// Package key (the directory holding the declaring unit).
    pub package: String,
    /// Module the struct lives in relative to its package, `None` for the package root.
    pub module: Option<String>,
    pub fields: Vec<FieldSchema>,
    /// Instances are persisted as one serialized blob, never as columns.
    pub is_embedded_document: bool,
    pub serde_rename_all: Option<RenameRule>,
}

impl StructSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Every struct name declared anywhere in the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownTypes {
    names: BTreeSet<String>,
}

impl KnownTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the name was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KnownTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
