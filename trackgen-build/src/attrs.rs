//! Parsing of `#[tracked(...)]`, `#[serde(...)]` and doc annotations.
//!
//! Shared with `trackgen-macros`, so the derive rejects exactly what the generator rejects.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use quote::ToTokens;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta};

/// Doc-comment markers flagging a struct as an embedded document.
pub const EMBEDDED_MARKERS: &[&str] = &["@jsonb", "@embedded"];

/// Field-level hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags {
    /// Relationship or back-reference; never traversed.
    pub relation: bool,
    /// Persisted as a serialized document column.
    pub document: bool,
    /// Explicit storage column.
    pub column: Option<String>,
    /// `#[serde(rename = "..")]` (serialize side).
    pub serde_rename: Option<String>,
}

impl FieldTags {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut tags = FieldTags::default();
        for attr in attrs {
            if attr.path().is_ident("tracked") {
                attr.parse_nested_meta(|meta| tags.parse_tracked(meta))?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| tags.parse_serde(meta))?;
            }
        }
        Ok(tags)
    }

    fn parse_tracked(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("relation") {
            self.relation = true;
            // relation(...) details belong to the ORM, only the marker matters here
            if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                let _: proc_macro2::TokenStream = content.parse()?;
            }
        } else if meta.path.is_ident("foreign_key") {
            let _: LitStr = meta.value()?.parse()?;
            self.relation = true;
        } else if meta.path.is_ident("json") {
            self.document = true;
        } else if meta.path.is_ident("serializer") {
            let value: LitStr = meta.value()?.parse()?;
            if value.value() != "json" {
                return Err(syn::Error::new(
                    value.span(),
                    format!("unsupported serializer `{}`, expected `json`", value.value()),
                ));
            }
            self.document = true;
        } else if meta.path.is_ident("column_type") {
            let value: LitStr = meta.value()?.parse()?;
            if matches!(value.value().to_ascii_lowercase().as_str(), "json" | "jsonb") {
                self.document = true;
            }
        } else if meta.path.is_ident("column") {
            let value: LitStr = meta.value()?.parse()?;
            if value.value().is_empty() {
                return Err(syn::Error::new(value.span(), "column name cannot be empty"));
            }
            self.column = Some(value.value());
        } else if meta.path.is_ident("embedded") || meta.path.is_ident("skip") {
            return Err(meta.error("this tracked option belongs on the struct, not on a field"));
        } else {
            return Err(meta.error(format!(
                "unknown tracked option `{}`",
                meta.path.to_token_stream().to_string().replace(' ', "")
            )));
        }
        Ok(())
    }

    fn parse_serde(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("rename") {
            if meta.input.peek(syn::Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                self.serde_rename = Some(value.value());
            } else {
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("serialize") {
                        let value: LitStr = inner.value()?.parse()?;
                        self.serde_rename = Some(value.value());
                        Ok(())
                    } else {
                        skip_meta_value(&inner)
                    }
                })?;
            }
            return Ok(());
        }
        skip_meta_value(&meta)
    }

    /// Storage column: explicit override, else the snake_case field name.
    pub fn column_for(&self, field_name: &str) -> String {
        self.column.clone().unwrap_or_else(|| field_name.to_snake_case())
    }
}

/// Struct-level hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTags {
    pub embedded: bool,
    pub skip: bool,
    pub rename_all: Option<RenameRule>,
}

impl StructTags {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut tags = StructTags::default();
        for attr in attrs {
            if attr.path().is_ident("doc") {
                if doc_text(attr).is_some_and(|text| EMBEDDED_MARKERS.iter().any(|marker| text.contains(marker))) {
                    tags.embedded = true;
                }
            } else if attr.path().is_ident("tracked") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("embedded") || meta.path.is_ident("jsonb") {
                        tags.embedded = true;
                        Ok(())
                    } else if meta.path.is_ident("skip") {
                        tags.skip = true;
                        Ok(())
                    } else {
                        Err(meta.error(format!(
                            "unknown tracked struct option `{}`, expected `embedded` or `skip`",
                            meta.path.to_token_stream().to_string().replace(' ', "")
                        )))
                    }
                })?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        if meta.input.peek(syn::Token![=]) {
                            let value: LitStr = meta.value()?.parse()?;
                            tags.rename_all = Some(RenameRule::parse(&value)?);
                        } else {
                            meta.parse_nested_meta(|inner| {
                                if inner.path.is_ident("serialize") {
                                    let value: LitStr = inner.value()?.parse()?;
                                    tags.rename_all = Some(RenameRule::parse(&value)?);
                                    Ok(())
                                } else {
                                    skip_meta_value(&inner)
                                }
                            })?;
                        }
                        Ok(())
                    } else {
                        skip_meta_value(&meta)
                    }
                })?;
            }
        }
        Ok(tags)
    }

    /// Key a field of this struct gets in diff output. Embedded documents are keyed the way
    /// serde writes them into the blob; everything else by field name.
    pub fn serialization_key(&self, field_name: &str, field: &FieldTags) -> String {
        if !self.embedded {
            return field_name.to_string();
        }
        if let Some(rename) = &field.serde_rename {
            return rename.clone();
        }
        match self.rename_all {
            Some(rule) => rule.apply(field_name),
            None => field_name.to_string(),
        }
    }
}

/// `#[serde(rename_all = "..")]` conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        let rule = match value.value().as_str() {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            other => {
                return Err(syn::Error::new(value.span(), format!("unknown rename_all rule `{other}`")));
            }
        };
        Ok(rule)
    }

    pub fn apply(self, field_name: &str) -> String {
        match self {
            RenameRule::Lower => field_name.to_ascii_lowercase(),
            RenameRule::Upper => field_name.to_ascii_uppercase(),
            RenameRule::Pascal => field_name.to_upper_camel_case(),
            RenameRule::Camel => field_name.to_lower_camel_case(),
            RenameRule::Snake => field_name.to_snake_case(),
            RenameRule::ScreamingSnake => field_name.to_shouty_snake_case(),
            RenameRule::Kebab => field_name.to_kebab_case(),
            RenameRule::ScreamingKebab => field_name.to_shouty_kebab_case(),
        }
    }
}

/// `#[tracked]` and `#[serde]` attributes as written, space separated.
pub fn raw_tag_text(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("tracked") || attr.path().is_ident("serde"))
        .map(|attr| attr.to_token_stream().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn doc_text(attr: &Attribute) -> Option<String> {
    match &attr.meta {
        Meta::NameValue(name_value) => match &name_value.value {
            Expr::Lit(ExprLit { lit: Lit::Str(text), .. }) => Some(text.value()),
            _ => None,
        },
        _ => None,
    }
}

/// Consume whatever follows a nested meta key we do not care about.
fn skip_meta_value(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}
