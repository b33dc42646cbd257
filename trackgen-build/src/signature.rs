//! Type signature analysis: just enough structure to classify a field.

use syn::{GenericArgument, PathArguments, Type, TypePath};

use crate::schema::{KnownTypes, Presence};

/// Structural view of a field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// `Option<T>`
    Optional(Box<TypeShape>),
    /// `Box<T>` (non trait-object)
    Boxed(Box<TypeShape>),
    /// `Rc<T>` / `Arc<T>` (non trait-object)
    Shared(Box<TypeShape>),
    /// `&T` / `&mut T`
    Reference(Box<TypeShape>),
    Sequence {
        kind: SequenceKind,
        element: Box<TypeShape>,
    },
    Mapping {
        key: Box<TypeShape>,
        value: Box<TypeShape>,
    },
    /// `serde_json::Value` or a trait object.
    Dynamic,
    /// Any other path type. `known` is set when the path names a struct of the batch.
    Named { path: String, known: bool },
    /// Tuples, function pointers, raw pointers and anything else.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// Collected from an iterator (`Vec`, `VecDeque`, sets, ...).
    Growable,
    /// Fixed-size `[T; N]`.
    Array,
}

const SEQUENCE_TYPES: &[&str] = &["Vec", "VecDeque", "LinkedList", "HashSet", "BTreeSet", "IndexSet", "BinaryHeap"];
const MAPPING_TYPES: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];
const SHARED_TYPES: &[&str] = &["Rc", "Arc"];

impl TypeShape {
    /// Analyse a field type. Struct names are resolved against `known`, so this must run after
    /// every unit of the batch has been scanned for declarations.
    pub fn analyze(ty: &Type, known: &KnownTypes) -> TypeShape {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => analyze_path(type_path, known),
            Type::Reference(reference) => TypeShape::Reference(Box::new(Self::analyze(&reference.elem, known))),
            Type::Array(array) => TypeShape::Sequence {
                kind: SequenceKind::Array,
                element: Box::new(Self::analyze(&array.elem, known)),
            },
            Type::Slice(slice) => TypeShape::Sequence {
                kind: SequenceKind::Growable,
                element: Box::new(Self::analyze(&slice.elem, known)),
            },
            Type::TraitObject(_) => TypeShape::Dynamic,
            Type::Paren(paren) => Self::analyze(&paren.elem, known),
            Type::Group(group) => Self::analyze(&group.elem, known),
            _ => TypeShape::Other,
        }
    }

    /// Strip one level of `Option`.
    pub fn split_optional(&self) -> (&TypeShape, Presence) {
        match self {
            TypeShape::Optional(inner) => (inner, Presence::Optional),
            other => (other, Presence::Required),
        }
    }

    /// Strip one level of `Box`.
    pub fn unboxed(&self) -> &TypeShape {
        match self {
            TypeShape::Boxed(inner) => inner,
            other => other,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeShape::Optional(_))
    }

    pub fn is_boxed(&self) -> bool {
        matches!(self, TypeShape::Boxed(_))
    }

    /// Name of the declared struct this shape points at, looking through one `Option` and one `Box`.
    pub fn struct_target(&self) -> Option<&str> {
        let (base, _) = self.split_optional();
        match base.unboxed() {
            TypeShape::Named { path, known: true } => Some(last_segment(path)),
            _ => None,
        }
    }

    /// True when copying the value with `Clone::clone` would not go through generated routines.
    pub fn requires_deep_copy(&self) -> bool {
        match self {
            TypeShape::Named { known, .. } => *known,
            TypeShape::Optional(inner) | TypeShape::Boxed(inner) => inner.requires_deep_copy(),
            TypeShape::Sequence { element, .. } => element.requires_deep_copy(),
            TypeShape::Mapping { value, .. } => value.requires_deep_copy(),
            _ => false,
        }
    }

    /// Element shape of a sequence, looking through an outer `Option`.
    pub fn sequence_element(&self) -> Option<&TypeShape> {
        match self.split_optional().0 {
            TypeShape::Sequence { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Value shape of a mapping, looking through an outer `Option`.
    pub fn mapping_value(&self) -> Option<&TypeShape> {
        match self.split_optional().0 {
            TypeShape::Mapping { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Path of a named type, for pattern matching.
    pub fn path(&self) -> Option<&str> {
        match self {
            TypeShape::Named { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Named type written with more than one segment (`chrono::Utc`, `crate::Foo`).
    pub fn is_qualified_path(&self) -> bool {
        self.path().is_some_and(|path| path.contains("::"))
    }
}

fn analyze_path(type_path: &TypePath, known: &KnownTypes) -> TypeShape {
    let path = path_to_string(type_path);
    let Some(last) = type_path.path.segments.last() else {
        return TypeShape::Other;
    };
    let ident = last.ident.to_string();
    let args = type_arguments(&last.arguments);

    if is_known_struct(&path, known) {
        return TypeShape::Named { path, known: true };
    }

    match (ident.as_str(), args.as_slice()) {
        ("Option", [inner]) => TypeShape::Optional(Box::new(TypeShape::analyze(inner, known))),
        ("Box", [Type::TraitObject(_)]) => TypeShape::Dynamic,
        ("Box", [inner]) => TypeShape::Boxed(Box::new(TypeShape::analyze(inner, known))),
        (name, [Type::TraitObject(_)]) if SHARED_TYPES.contains(&name) => TypeShape::Dynamic,
        (name, [inner]) if SHARED_TYPES.contains(&name) => TypeShape::Shared(Box::new(TypeShape::analyze(inner, known))),
        (name, [element, ..]) if SEQUENCE_TYPES.contains(&name) => TypeShape::Sequence {
            kind: SequenceKind::Growable,
            element: Box::new(TypeShape::analyze(element, known)),
        },
        (name, [key, value, ..]) if MAPPING_TYPES.contains(&name) => TypeShape::Mapping {
            key: Box::new(TypeShape::analyze(key, known)),
            value: Box::new(TypeShape::analyze(value, known)),
        },
        ("Value", []) if path == "Value" || path.ends_with("serde_json::Value") => TypeShape::Dynamic,
        _ => TypeShape::Named { path, known: false },
    }
}

/// A path names a batch struct when its last segment is known and it is either bare or
/// rooted at `crate`/`self`/`super`.
fn is_known_struct(path: &str, known: &KnownTypes) -> bool {
    let mut segments = path.split("::");
    let first = segments.next().unwrap_or_default();
    let name = last_segment(path);
    let local = !path.contains("::") || matches!(first, "crate" | "self" | "super");
    local && known.contains(name)
}

fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `a::b::C<T>` → `a::b::C` (leading `::` dropped, generics dropped).
fn path_to_string(type_path: &TypePath) -> String {
    type_path
        .path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Pattern match on a type path: exact, or either side is a qualified suffix of the other
/// (`DateTime` matches `chrono::DateTime`, `::chrono::DateTime` matches too).
pub fn matches_type_pattern(path: &str, pattern: &str) -> bool {
    path == pattern || pattern.ends_with(&format!("::{path}")) || path.ends_with(&format!("::{pattern}"))
}

/// Convert syn::Type to a readable signature string.
pub fn type_to_string(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => {
            let segments: Vec<String> = type_path
                .path
                .segments
                .iter()
                .map(|seg| {
                    let ident = seg.ident.to_string();
                    match &seg.arguments {
                        PathArguments::None => ident,
                        PathArguments::AngleBracketed(args) => {
                            let inner: Vec<String> = args
                                .args
                                .iter()
                                .map(|arg| match arg {
                                    GenericArgument::Type(inner_ty) => type_to_string(inner_ty),
                                    other => tokens_to_string(other),
                                })
                                .collect();
                            format!("{}<{}>", ident, inner.join(", "))
                        }
                        PathArguments::Parenthesized(_) => tokens_to_string(seg),
                    }
                })
                .collect();
            segments.join("::")
        }
        Type::Reference(reference) => {
            let lifetime = reference
                .lifetime
                .as_ref()
                .map(|lifetime| format!("{lifetime} "))
                .unwrap_or_default();
            let mutability = if reference.mutability.is_some() { "mut " } else { "" };
            format!("&{lifetime}{mutability}{}", type_to_string(&reference.elem))
        }
        Type::Array(array) => format!("[{}; {}]", type_to_string(&array.elem), tokens_to_string(&array.len)),
        Type::Slice(slice) => format!("[{}]", type_to_string(&slice.elem)),
        Type::Tuple(tuple) => {
            let elems: Vec<String> = tuple.elems.iter().map(type_to_string).collect();
            format!("({})", elems.join(", "))
        }
        Type::Paren(paren) => type_to_string(&paren.elem),
        Type::Group(group) => type_to_string(&group.elem),
        other => tokens_to_string(other),
    }
}

fn tokens_to_string(tokens: &impl quote::ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(" < ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
}
