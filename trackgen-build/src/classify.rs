//! Field classification: type shape + tags → [`Category`].

use crate::attrs::FieldTags;
use crate::schema::{Category, KnownTypes, Presence};
use crate::signature::{TypeShape, matches_type_pattern};

pub const TEMPORAL_TYPES: &[&str] = &[
    "chrono::DateTime",
    "chrono::NaiveDateTime",
    "chrono::NaiveDate",
    "chrono::NaiveTime",
    "std::time::SystemTime",
];

pub const IDENTIFIER_TYPES: &[&str] = &["uuid::Uuid", "ulid::Ulid"];

pub const SOFT_DELETE_TYPES: &[&str] = &["trackgen::DeletedAt"];

/// Types copied and compared by value.
pub const SCALAR_TYPES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32",
    "f64", "String",
];

/// Classifies fields against the frozen known-types set.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    known: &'a KnownTypes,
}

impl<'a> Classifier<'a> {
    pub fn new(known: &'a KnownTypes) -> Self {
        Self { known }
    }

    /// First matching rule wins.
    pub fn classify(&self, shape: &TypeShape, tags: &FieldTags) -> Category {
        if tags.relation {
            return Category::Primitive;
        }
        if tags.document {
            return Category::SerializedDocument;
        }
        self.classify_shape(shape)
    }

    fn classify_shape(&self, shape: &TypeShape) -> Category {
        let (base, presence) = shape.split_optional();

        if let Some(path) = base.path() {
            if matches_any(path, TEMPORAL_TYPES) {
                return Category::Temporal(presence);
            }
            if matches_any(path, IDENTIFIER_TYPES) {
                return Category::UniqueIdentifier(presence);
            }
            if matches_any(path, SOFT_DELETE_TYPES) {
                return Category::SoftDeleteMarker(presence);
            }
        }

        if let Some(target) = shape.struct_target() {
            debug_assert!(self.known.contains(target));
            return match presence {
                Presence::Required => Category::NestedDocument,
                Presence::Optional => Category::NestedDocumentRef,
            };
        }

        match base {
            TypeShape::Sequence { .. } => return Category::Collection,
            TypeShape::Mapping { .. } => return Category::Association,
            TypeShape::Dynamic => return Category::DynamicValue,
            _ => {}
        }

        if presence == Presence::Required && base.path().is_some_and(|path| SCALAR_TYPES.contains(&path)) {
            return Category::Primitive;
        }

        if presence == Presence::Optional
            || matches!(base, TypeShape::Shared(_) | TypeShape::Reference(_))
            || base.is_qualified_path()
        {
            return Category::ComparableReference;
        }

        Category::Opaque
    }

    /// Second pass, run once embedded-document membership is final. Fields of an embedded
    /// document live inside their owner's blob, so none of them can carry a merge directive
    /// of its own: document-tagged fields fall back to their shape-derived category.
    pub fn refine(&self, owner_embedded: bool, shape: &TypeShape, tags: &FieldTags, category: Category) -> Category {
        match category {
            Category::SerializedDocument if owner_embedded => {
                let untagged = FieldTags {
                    document: false,
                    ..tags.clone()
                };
                self.classify(shape, &untagged)
            }
            other => other,
        }
    }
}

fn matches_any(path: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| matches_type_pattern(path, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::Type;

    fn classify_with(code: &str, tags: FieldTags) -> Category {
        let known: KnownTypes = ["Person", "Address", "Settings"].into_iter().collect();
        let ty: Type = syn::parse_str(code).unwrap();
        let shape = TypeShape::analyze(&ty, &known);
        Classifier::new(&known).classify(&shape, &tags)
    }

    fn classify(code: &str) -> Category {
        classify_with(code, FieldTags::default())
    }

    #[test]
    fn test_relation_tag_forces_primitive() {
        let tags = FieldTags {
            relation: true,
            document: true,
            ..FieldTags::default()
        };
        assert_eq!(classify_with("Vec<Person>", tags.clone()), Category::Primitive);
        assert_eq!(classify_with("Option<Box<Person>>", tags), Category::Primitive);
    }

    #[test]
    fn test_document_tag() {
        let tags = FieldTags {
            document: true,
            ..FieldTags::default()
        };
        assert_eq!(classify_with("Option<Settings>", tags.clone()), Category::SerializedDocument);
        assert_eq!(classify_with("HashMap<String, String>", tags), Category::SerializedDocument);
    }

    #[test]
    fn test_well_known_types() {
        assert_eq!(classify("DateTime<Utc>"), Category::Temporal(Presence::Required));
        assert_eq!(classify("Option<chrono::NaiveDate>"), Category::Temporal(Presence::Optional));
        assert_eq!(classify("std::time::SystemTime"), Category::Temporal(Presence::Required));
        assert_eq!(classify("Uuid"), Category::UniqueIdentifier(Presence::Required));
        assert_eq!(classify("Option<uuid::Uuid>"), Category::UniqueIdentifier(Presence::Optional));
        assert_eq!(classify("trackgen::DeletedAt"), Category::SoftDeleteMarker(Presence::Required));
        assert_eq!(classify("Option<DeletedAt>"), Category::SoftDeleteMarker(Presence::Optional));
    }

    #[test]
    fn test_nested_documents() {
        assert_eq!(classify("Address"), Category::NestedDocument);
        assert_eq!(classify("Box<Person>"), Category::NestedDocument);
        assert_eq!(classify("Option<Person>"), Category::NestedDocumentRef);
        assert_eq!(classify("Option<Box<Person>>"), Category::NestedDocumentRef);
    }

    #[test]
    fn test_containers() {
        assert_eq!(classify("Vec<Option<Box<Person>>>"), Category::Collection);
        assert_eq!(classify("Option<Vec<String>>"), Category::Collection);
        assert_eq!(classify("[Address; 3]"), Category::Collection);
        assert_eq!(classify("BTreeMap<String, Address>"), Category::Association);
        assert_eq!(classify("serde_json::Value"), Category::DynamicValue);
        assert_eq!(classify("Box<dyn std::any::Any>"), Category::DynamicValue);
    }

    #[test]
    fn test_scalars_and_fallbacks() {
        assert_eq!(classify("String"), Category::Primitive);
        assert_eq!(classify("u64"), Category::Primitive);
        assert_eq!(classify("Option<String>"), Category::ComparableReference);
        assert_eq!(classify("Arc<String>"), Category::ComparableReference);
        assert_eq!(classify("rust_decimal::Decimal"), Category::ComparableReference);
        assert_eq!(classify("Status"), Category::Opaque);
        assert_eq!(classify("(u8, u8)"), Category::Opaque);
    }

    #[test]
    fn test_refine_drops_document_inside_embedded_owner() {
        let known: KnownTypes = ["Settings", "Theme"].into_iter().collect();
        let classifier = Classifier::new(&known);
        let tags = FieldTags {
            document: true,
            ..FieldTags::default()
        };

        let ty: Type = syn::parse_str("Option<Theme>").unwrap();
        let shape = TypeShape::analyze(&ty, &known);
        let first = classifier.classify(&shape, &tags);
        assert_eq!(first, Category::SerializedDocument);
        assert_eq!(classifier.refine(true, &shape, &tags, first), Category::NestedDocumentRef);
        assert_eq!(classifier.refine(false, &shape, &tags, first), Category::SerializedDocument);

        let ty: Type = syn::parse_str("Theme").unwrap();
        let shape = TypeShape::analyze(&ty, &known);
        let nested = classifier.classify(&shape, &FieldTags::default());
        assert_eq!(classifier.refine(true, &shape, &FieldTags::default(), nested), Category::NestedDocument);
    }
}
