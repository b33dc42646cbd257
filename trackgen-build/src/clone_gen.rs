//! Deep-copy synthesis: one `DeepClone` impl per struct.

use proc_macro2::TokenStream;
use quote::quote;

use crate::errors::GenerateResult;
use crate::schema::{Category, StructSchema};
use crate::signature::{SequenceKind, TypeShape};
use crate::template::{ArtifactTemplate, Capability, FieldSlots, StructSlots};

/// Emit `impl DeepClone for <Struct>`.
///
/// The result never shares storage with the source for nested documents, collections or
/// associations whose elements are nested documents; everything else goes through `Clone`.
pub fn synthesize_clone(schema: &StructSchema, template: &ArtifactTemplate) -> GenerateResult<TokenStream> {
    let slots = StructSlots::new(schema)?;
    let runtime = template.runtime();
    let name = &slots.ident;
    let review = slots.review_doc(Capability::Clone);

    let inits = slots.fields.iter().map(|field| {
        let ident = &field.ident;
        let value = clone_field(field, runtime);
        quote!(#ident: #value)
    });

    Ok(quote! {
        #review
        #[allow(clippy::clone_on_copy, clippy::redundant_closure)]
        impl #runtime::DeepClone for #name {
            fn deep_clone(&self) -> Self {
                Self {
                    #(#inits,)*
                }
            }
        }
    })
}

fn clone_field(field: &FieldSlots<'_>, runtime: &syn::Path) -> TokenStream {
    let ident = &field.ident;
    let source = Source::Place(quote!(self.#ident));

    match field.category() {
        Category::Primitive
        | Category::Temporal(_)
        | Category::UniqueIdentifier(_)
        | Category::SoftDeleteMarker(_)
        | Category::ComparableReference
        | Category::DynamicValue
        | Category::Opaque => copy_value(&source),
        Category::NestedDocument => clone_nested(field.shape(), &source, runtime),
        Category::NestedDocumentRef => clone_nested_ref(field.shape(), &source, runtime),
        Category::Collection | Category::Association => clone_container(field.shape(), &source, runtime),
        Category::SerializedDocument => clone_shape(field.shape(), &source, runtime),
    }
}

/// `Box<T>` is re-boxed around a fresh copy.
fn clone_nested(shape: &TypeShape, source: &Source, runtime: &syn::Path) -> TokenStream {
    clone_shape(shape, source, runtime)
}

/// `None` stays `None`, `Some` gets a fresh copy (re-boxed when boxed).
fn clone_nested_ref(shape: &TypeShape, source: &Source, runtime: &syn::Path) -> TokenStream {
    match shape {
        TypeShape::Optional(inner) => {
            let receiver = source.receiver();
            let value = clone_shape(inner, &Source::Borrowed(quote!(value)), runtime);
            quote!(#receiver.as_ref().map(|value| #value))
        }
        other => clone_shape(other, source, runtime),
    }
}

/// Element-wise copy when elements need it, bulk copy otherwise. `Option` wrappers keep the
/// absent/empty distinction.
fn clone_container(shape: &TypeShape, source: &Source, runtime: &syn::Path) -> TokenStream {
    if shape.requires_deep_copy() {
        clone_shape(shape, source, runtime)
    } else {
        copy_value(source)
    }
}

fn copy_value(source: &Source) -> TokenStream {
    let borrowed = source.borrowed();
    quote!(::std::clone::Clone::clone(#borrowed))
}

fn clone_shape(shape: &TypeShape, source: &Source, runtime: &syn::Path) -> TokenStream {
    if !shape.requires_deep_copy() {
        return copy_value(source);
    }

    match shape {
        TypeShape::Named { .. } => {
            let borrowed = source.borrowed();
            quote!(#runtime::DeepClone::deep_clone(#borrowed))
        }
        TypeShape::Boxed(inner) => {
            let value = clone_shape(inner, &source.unboxed(), runtime);
            quote!(::std::boxed::Box::new(#value))
        }
        TypeShape::Optional(inner) => {
            let receiver = source.receiver();
            let value = clone_shape(inner, &Source::Borrowed(quote!(value)), runtime);
            quote!(#receiver.as_ref().map(|value| #value))
        }
        TypeShape::Sequence {
            kind: SequenceKind::Array,
            element,
        } => {
            let receiver = source.receiver();
            let value = clone_shape(element, &Source::Place(quote!(#receiver[index])), runtime);
            quote!(::std::array::from_fn(|index| #value))
        }
        TypeShape::Sequence {
            kind: SequenceKind::Growable,
            element,
        } => {
            let receiver = source.receiver();
            let value = clone_shape(element, &Source::Borrowed(quote!(item)), runtime);
            quote!(#receiver.iter().map(|item| #value).collect())
        }
        TypeShape::Mapping { value, .. } => {
            let receiver = source.receiver();
            let value = clone_shape(value, &Source::Borrowed(quote!(value)), runtime);
            quote!(#receiver.iter().map(|(key, value)| (::std::clone::Clone::clone(key), #value)).collect())
        }
        _ => copy_value(source),
    }
}

/// An expression to copy from: either a place (`self.name`, `items[index]`) or a binding that
/// already holds a reference (`value`, `item`).
enum Source {
    Place(TokenStream),
    Borrowed(TokenStream),
}

impl Source {
    fn borrowed(&self) -> TokenStream {
        match self {
            Source::Place(place) => quote!(&#place),
            Source::Borrowed(reference) => reference.clone(),
        }
    }

    fn receiver(&self) -> TokenStream {
        match self {
            Source::Place(place) => place.clone(),
            Source::Borrowed(reference) => reference.clone(),
        }
    }

    /// Reference to the contents of a `Box`.
    fn unboxed(&self) -> Source {
        match self {
            Source::Place(place) => Source::Borrowed(quote!(&*#place)),
            Source::Borrowed(reference) => Source::Borrowed(quote!(&**#reference)),
        }
    }
}
