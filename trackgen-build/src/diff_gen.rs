//! Minimal-change diff synthesis: one `Diff` impl per struct.
//!
//! `self` is the previous state, `next` the new one; recorded values always come from `next`.
//! Document-backed columns are the only place merge directives appear, and their patches are
//! suppressed when they serialize to a canonical-empty form.

use proc_macro2::TokenStream;
use quote::quote;

use crate::errors::GenerateResult;
use crate::schema::{Category, Presence, StructSchema};
use crate::signature::TypeShape;
use crate::template::{ArtifactTemplate, Capability, FieldSlots, StructSlots};

/// Emit `impl Diff for <Struct>`.
pub fn synthesize_diff(schema: &StructSchema, template: &ArtifactTemplate) -> GenerateResult<TokenStream> {
    let slots = StructSlots::new(schema)?;
    let runtime = template.runtime();
    let name = &slots.ident;
    let review = slots.review_doc(Capability::Diff);

    if slots.fields.is_empty() {
        return Ok(quote! {
            #review
            impl #runtime::Diff for #name {
                fn diff(&self, _next: &Self) -> ::std::result::Result<#runtime::Changes, #runtime::DiffError> {
                    ::std::result::Result::Ok(#runtime::Changes::new())
                }
            }
        });
    }

    let steps = slots.fields.iter().map(|field| diff_field(field, runtime));

    Ok(quote! {
        #review
        impl #runtime::Diff for #name {
            fn diff(&self, next: &Self) -> ::std::result::Result<#runtime::Changes, #runtime::DiffError> {
                let mut changes = #runtime::Changes::new();
                #(#steps)*
                ::std::result::Result::Ok(changes)
            }
        }
    })
}

fn diff_field(field: &FieldSlots<'_>, runtime: &syn::Path) -> TokenStream {
    match field.category() {
        // relationship-forced primitives land here too: plain equality, never traversed
        Category::Primitive | Category::ComparableReference | Category::SoftDeleteMarker(_) => value_change(field),
        Category::UniqueIdentifier(Presence::Required) => value_change(field),
        Category::UniqueIdentifier(Presence::Optional) => optional_identifier_change(field),
        Category::Temporal(presence) => temporal_change(field, presence, runtime),
        Category::NestedDocument => nested_change(field, runtime),
        Category::NestedDocumentRef => nested_ref_change(field, runtime),
        Category::SerializedDocument => document_change(field, runtime),
        Category::Collection | Category::Association | Category::DynamicValue | Category::Opaque => {
            structural_change(field)
        }
    }
}

/// `!=`, then record the new value.
fn value_change(field: &FieldSlots<'_>) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    quote! {
        if self.#ident != next.#ident {
            changes.record_value(#key, &next.#ident)?;
        }
    }
}

/// Whole-value comparison for containers and unknown shapes; no element-level diffing.
fn structural_change(field: &FieldSlots<'_>) -> TokenStream {
    value_change(field)
}

/// Presence first, then value.
fn optional_identifier_change(field: &FieldSlots<'_>) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    quote! {
        match (&self.#ident, &next.#ident) {
            (None, None) => {}
            (Some(previous), Some(current)) if previous == current => {}
            _ => changes.record_value(#key, &next.#ident)?,
        }
    }
}

/// Instants are compared semantically, so the same moment in two offsets is no change.
fn temporal_change(field: &FieldSlots<'_>, presence: Presence, runtime: &syn::Path) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    match presence {
        Presence::Required => quote! {
            if !#runtime::Temporal::same_instant(&self.#ident, &next.#ident) {
                changes.record_value(#key, &next.#ident)?;
            }
        },
        Presence::Optional => quote! {
            match (&self.#ident, &next.#ident) {
                (None, None) => {}
                (Some(previous), Some(current)) if #runtime::Temporal::same_instant(previous, current) => {}
                _ => changes.record_value(#key, &next.#ident)?,
            }
        },
    }
}

/// Recursive diff stored as a plain nested mapping, only when non-empty.
fn nested_change(field: &FieldSlots<'_>, runtime: &syn::Path) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    let previous = place_ref(field.shape(), quote!(self.#ident));
    let current = place_ref(field.shape(), quote!(next.#ident));
    quote! {
        changes.record_nested(#key, #runtime::Diff::diff(#previous, #current)?);
    }
}

/// Either side absent and they differ: the whole new value (null when it disappeared).
/// Both present: recursive diff as a nested mapping.
fn nested_ref_change(field: &FieldSlots<'_>, runtime: &syn::Path) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    let (previous, current) = binding_refs(field);
    quote! {
        match (&self.#ident, &next.#ident) {
            (Some(previous), Some(current)) => {
                changes.record_nested(#key, #runtime::Diff::diff(#previous, #current)?);
            }
            (None, None) => {}
            _ => changes.record_value(#key, &next.#ident)?,
        }
    }
}

/// Document-backed column: merge directives carrying only what changed.
fn document_change(field: &FieldSlots<'_>, runtime: &syn::Path) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    let column = &field.column;
    let shape = field.shape();

    match (shape.struct_target().is_some(), field.is_optional()) {
        (true, false) => {
            let previous = place_ref(shape, quote!(self.#ident));
            let current = place_ref(shape, quote!(next.#ident));
            quote! {
                changes.record_document_patch(#key, #column, #runtime::Diff::diff(#previous, #current)?)?;
            }
        }
        (true, true) => {
            let (previous, current) = binding_refs(field);
            quote! {
                match (&self.#ident, &next.#ident) {
                    (None, None) => {}
                    (None, Some(current)) => changes.record_document(#key, #column, current)?,
                    (Some(_), None) => changes.record_null(#key),
                    (Some(previous), Some(current)) => {
                        changes.record_document_patch(#key, #column, #runtime::Diff::diff(#previous, #current)?)?;
                    }
                }
            }
        }
        (false, true) => quote! {
            match (&self.#ident, &next.#ident) {
                (Some(_), None) => changes.record_null(#key),
                (_, Some(current)) if self.#ident != next.#ident => {
                    changes.record_document(#key, #column, current)?;
                }
                _ => {}
            }
        },
        (false, false) => quote! {
            if self.#ident != next.#ident {
                changes.record_document(#key, #column, &next.#ident)?;
            }
        },
    }
}

/// `&place`, or `&*place` when the field is a `Box`.
fn place_ref(shape: &TypeShape, place: TokenStream) -> TokenStream {
    if shape.is_boxed() {
        quote!(&*#place)
    } else {
        quote!(&#place)
    }
}

/// References to the struct behind `previous`/`current` bindings of an `Option` match.
fn binding_refs(field: &FieldSlots<'_>) -> (TokenStream, TokenStream) {
    if field.is_boxed() {
        (quote!(&**previous), quote!(&**current))
    } else {
        (quote!(previous), quote!(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_registry;
    use crate::source::SourceUnit;

    /// Emitted tokens with all whitespace removed.
    fn emit(source: &str, name: &str) -> String {
        let registry = build_registry(&[SourceUnit::inline("test.rs", source)]).unwrap();
        let template = ArtifactTemplate::new(Capability::Diff, "trackgen").unwrap();
        let tokens = synthesize_diff(registry.get(name).unwrap(), &template).unwrap();
        syn::parse2::<syn::File>(tokens.clone()).expect("emitted impl is valid Rust");
        tokens.to_string().split_whitespace().collect()
    }

    const MODELS: &str = r#"
        struct Person {
            name: String,
            address: Address,
            manager: Option<Box<Person>>,
            boss: Box<Person>,
            born_at: DateTime<Utc>,
            left_at: Option<DateTime<Utc>>,
            id: Uuid,
            external_id: Option<Uuid>,
            deleted_at: DeletedAt,
            tags: Vec<String>,
            extra: serde_json::Value,
            status: Status,
            #[tracked(relation)]
            team: Option<Box<Team>>,
        }
        struct Address { city: String }
        struct Team { name: String }

        /// @jsonb
        #[serde(rename_all = "camelCase")]
        struct Settings { dark_mode: bool, #[tracked(json)] nested: Option<Address> }

        struct Service {
            #[tracked(json, column = "data")]
            payload: Settings,
            #[tracked(json)]
            settings: Option<Settings>,
            #[tracked(json)]
            boxed: Option<Box<Settings>>,
            #[tracked(json)]
            labels: Option<HashMap<String, String>>,
            #[tracked(json)]
            flags: Vec<String>,
        }
    "#;

    #[test]
    fn test_primitive_and_friends() {
        let out = emit(MODELS, "Person");
        assert!(out.contains("fndiff(&self,next:&Self)->::std::result::Result<::trackgen::Changes,::trackgen::DiffError>"));
        assert!(out.contains("ifself.name!=next.name{changes.record_value(\"name\",&next.name)?;}"));
        assert!(out.contains("ifself.id!=next.id{changes.record_value(\"id\",&next.id)?;}"));
        assert!(out.contains("ifself.deleted_at!=next.deleted_at{changes.record_value(\"deleted_at\",&next.deleted_at)?;}"));
        assert!(out.contains("ifself.team!=next.team{changes.record_value(\"team\",&next.team)?;}"));
    }

    #[test]
    fn test_floats_compare_with_plain_inequality() {
        let out = emit("struct Metric { ratio: f64, weight: Option<f32> }", "Metric");
        assert!(out.contains("ifself.ratio!=next.ratio{changes.record_value(\"ratio\",&next.ratio)?;}"));
        assert!(out.contains("ifself.weight!=next.weight{changes.record_value(\"weight\",&next.weight)?;}"));
        assert!(!out.contains("same_instant"));
    }

    #[test]
    fn test_structural_fields() {
        let out = emit(MODELS, "Person");
        assert!(out.contains("ifself.tags!=next.tags{changes.record_value(\"tags\",&next.tags)?;}"));
        assert!(out.contains("ifself.extra!=next.extra{changes.record_value(\"extra\",&next.extra)?;}"));
        assert!(out.contains("ifself.status!=next.status"));
        assert!(out.contains("Needsmanualreview:status(Status)comparedstructurally"));
    }

    #[test]
    fn test_temporal_and_identifier_options() {
        let out = emit(MODELS, "Person");
        assert!(out.contains("if!::trackgen::Temporal::same_instant(&self.born_at,&next.born_at)"));
        assert!(out.contains(
            "(Some(previous),Some(current))if::trackgen::Temporal::same_instant(previous,current)=>{}_=>changes.record_value(\"left_at\",&next.left_at)?,"
        ));
        assert!(out.contains(
            "(Some(previous),Some(current))ifprevious==current=>{}_=>changes.record_value(\"external_id\",&next.external_id)?,"
        ));
    }

    #[test]
    fn test_nested_documents() {
        let out = emit(MODELS, "Person");
        assert!(out.contains("changes.record_nested(\"address\",::trackgen::Diff::diff(&self.address,&next.address)?);"));
        assert!(out.contains("changes.record_nested(\"boss\",::trackgen::Diff::diff(&*self.boss,&*next.boss)?);"));
        assert!(out.contains(
            "match(&self.manager,&next.manager){(Some(previous),Some(current))=>{changes.record_nested(\"manager\",::trackgen::Diff::diff(&**previous,&**current)?);}(None,None)=>{}_=>changes.record_value(\"manager\",&next.manager)?,}"
        ));
    }

    #[test]
    fn test_document_fields() {
        let out = emit(MODELS, "Service");
        assert!(out.contains(
            "changes.record_document_patch(\"payload\",\"data\",::trackgen::Diff::diff(&self.payload,&next.payload)?)?;"
        ));
        assert!(out.contains("(None,Some(current))=>changes.record_document(\"settings\",\"settings\",current)?,"));
        assert!(out.contains("(Some(_),None)=>changes.record_null(\"settings\"),"));
        assert!(out.contains("::trackgen::Diff::diff(&**previous,&**current)?"));
        assert!(out.contains(
            "(_,Some(current))ifself.labels!=next.labels=>{changes.record_document(\"labels\",\"labels\",current)?;}"
        ));
        assert!(out.contains("ifself.flags!=next.flags{changes.record_document(\"flags\",\"flags\",&next.flags)?;}"));
    }

    #[test]
    fn test_embedded_document_fields_never_merge() {
        let out = emit(MODELS, "Settings");
        assert!(out.contains("changes.record_value(\"darkMode\",&next.dark_mode)?;"));
        assert!(out.contains("changes.record_nested(\"nested\",::trackgen::Diff::diff(previous,current)?"));
        assert!(!out.contains("record_document"));
    }

    #[test]
    fn test_empty_struct() {
        let out = emit("struct Empty {}", "Empty");
        assert!(out.contains("fndiff(&self,_next:&Self)"));
        assert!(out.contains("::std::result::Result::Ok(::trackgen::Changes::new())"));
    }
}
