//! Template glue shared by both synthesizers: named slots for struct and field metadata,
//! helper predicates, and artifact rendering.

use std::fmt;
use std::str::FromStr;

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Ident, LitStr};

use crate::errors::{GenerateError, GenerateResult};
use crate::schema::{Category, FieldSchema, StructSchema};
use crate::signature::TypeShape;
use crate::source::GENERATED_HEADER;

/// What an artifact provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Clone,
    Diff,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Clone, Capability::Diff];

    pub fn name(self) -> &'static str {
        match self {
            Capability::Clone => "clone",
            Capability::Diff => "diff",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Capability::Clone => "clone.rs",
            Capability::Diff => "diff.rs",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clone" => Ok(Capability::Clone),
            "diff" => Ok(Capability::Diff),
            other => Err(format!("unknown capability `{other}`, expected `clone` or `diff`")),
        }
    }
}

/// Slots for one struct.
pub struct StructSlots<'a> {
    pub schema: &'a StructSchema,
    pub ident: Ident,
    pub fields: Vec<FieldSlots<'a>>,
}

impl<'a> StructSlots<'a> {
    pub fn new(schema: &'a StructSchema) -> GenerateResult<Self> {
        let ident = parse_ident(&schema.name, &schema.name)?;
        let fields = schema
            .fields
            .iter()
            .map(|field| FieldSlots::new(schema, field))
            .collect::<GenerateResult<Vec<_>>>()?;
        Ok(Self { schema, ident, fields })
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Fields whose category is unknown enough to deserve a human look.
    pub fn review_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.needs_review())
            .map(|field| field.name())
            .collect()
    }

    /// `#[doc]` attribute listing review fields with their types, empty when there are none.
    pub fn review_doc(&self, capability: Capability) -> TokenStream {
        let fields: Vec<String> = self
            .fields
            .iter()
            .filter(|field| field.needs_review())
            .map(|field| format!("{} ({})", field.name(), field.signature()))
            .collect();
        if fields.is_empty() {
            return TokenStream::new();
        }
        let verb = match capability {
            Capability::Clone => "copied shallowly",
            Capability::Diff => "compared structurally",
        };
        let text = format!(" Needs manual review: {} {verb} (unrecognized type).", fields.join(", "));
        quote!(#[doc = #text])
    }
}

/// Slots for one field.
pub struct FieldSlots<'a> {
    pub schema: &'a FieldSchema,
    pub ident: Ident,
    /// Serialization key literal.
    pub key: LitStr,
    /// Storage column literal.
    pub column: LitStr,
}

impl<'a> FieldSlots<'a> {
    fn new(owner: &StructSchema, schema: &'a FieldSchema) -> GenerateResult<Self> {
        let routine = format!("{}.{}", owner.name, schema.name);
        Ok(Self {
            ident: parse_ident(&routine, &schema.ident)?,
            key: LitStr::new(&schema.serialization_key, Span::call_site()),
            column: LitStr::new(&schema.column, Span::call_site()),
            schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Field type as written.
    pub fn signature(&self) -> &str {
        &self.schema.signature
    }

    pub fn category(&self) -> Category {
        self.schema.category
    }

    pub fn shape(&self) -> &TypeShape {
        &self.schema.shape
    }

    pub fn is_optional(&self) -> bool {
        self.shape().is_optional()
    }

    /// `Box<T>` or `Option<Box<T>>`.
    pub fn is_boxed(&self) -> bool {
        self.shape().split_optional().0.is_boxed()
    }

    /// Sequence whose elements are optional nested documents (`Vec<Option<Box<T>>>`).
    pub fn is_collection_of_nested_refs(&self) -> bool {
        self.shape()
            .sequence_element()
            .is_some_and(|element| element.is_optional() && element.struct_target().is_some())
    }

    /// Sequence whose elements are nested documents by value or box.
    pub fn is_collection_of_nested(&self) -> bool {
        self.shape()
            .sequence_element()
            .is_some_and(|element| !element.is_optional() && element.struct_target().is_some())
    }

    /// Mapping whose values are nested documents.
    pub fn is_mapping_of_nested(&self) -> bool {
        self.shape().mapping_value().is_some_and(|value| value.struct_target().is_some())
    }

    pub fn needs_review(&self) -> bool {
        self.schema.needs_review()
    }
}

fn parse_ident(routine: &str, text: &str) -> GenerateResult<Ident> {
    syn::parse_str::<Ident>(text)
        .map_err(|err| GenerateError::template(routine, format!("`{text}` is not a valid identifier: {err}")))
}

/// Renders one artifact: header, imports, items, then formatting.
pub struct ArtifactTemplate {
    capability: Capability,
    runtime: syn::Path,
}

impl ArtifactTemplate {
    /// `runtime_crate` is the path generated code uses for the runtime (`trackgen`, `crate`, ...).
    pub fn new(capability: Capability, runtime_crate: &str) -> GenerateResult<Self> {
        let text = runtime_crate.trim();
        let path_text = if text.starts_with("::") || matches!(text.split("::").next(), Some("crate" | "self" | "super")) {
            text.to_string()
        } else {
            format!("::{text}")
        };
        let runtime = syn::parse_str::<syn::Path>(&path_text).map_err(|err| {
            GenerateError::template(
                capability.name(),
                format!("invalid runtime crate path `{runtime_crate}`: {err}"),
            )
        })?;
        Ok(Self { capability, runtime })
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Path prefix for runtime items in generated code.
    pub fn runtime(&self) -> &syn::Path {
        &self.runtime
    }

    /// `use super::<module>::<Struct>;` for every struct of the artifact.
    pub fn imports(&self, structs: &[&StructSchema]) -> GenerateResult<TokenStream> {
        let mut imports = Vec::with_capacity(structs.len());
        for schema in structs {
            let name = parse_ident(&schema.name, &schema.name)?;
            let import = match &schema.module {
                Some(module) => {
                    let module = parse_ident(&schema.name, module)?;
                    quote!(use super::#module::#name;)
                }
                None => quote!(use super::#name;),
            };
            imports.push(import);
        }
        Ok(quote!(#(#imports)*))
    }

    pub fn render(&self, imports: TokenStream, items: &[TokenStream]) -> String {
        let tokens = quote! {
            #imports
            #(#items)*
        };
        let body = format_tokens(tokens).unwrap_or_else(|unformatted| {
            log::warn!("{} artifact could not be formatted, emitting unformatted source", self.capability);
            unformatted
        });
        format!("{GENERATED_HEADER}\n// trackgen capability: {}\n\n{body}", self.capability)
    }
}

/// Pretty-print tokens as a source file. On failure the raw token text comes back as the error.
pub fn format_tokens(tokens: TokenStream) -> Result<String, String> {
    match syn::parse2::<syn::File>(tokens.clone()) {
        Ok(file) => Ok(prettyplease::unparse(&file)),
        Err(_) => Err(tokens.to_string()),
    }
}
