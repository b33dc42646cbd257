use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Fields, LitStr, Result, parse_macro_input, spanned::Spanned};
use trackgen_build::attrs::{FieldTags, StructTags};

/// Derive `trackgen::Tracked`: validates `#[tracked(..)]` attributes and records, for every
/// field, the key its changes are recorded under and the storage column it maps to.
///
/// Field options: `relation`, `json`, `column = ".."`. Struct options: `embedded`, `skip`.
#[proc_macro_derive(Tracked, attributes(tracked))]
pub fn derive_tracked(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_tracked(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_tracked(input: &DeriveInput) -> Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new(input.ident.span(), "Tracked can only be derived for structs"));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new(
            data.fields.span(),
            "Tracked requires a struct with named fields",
        ));
    };

    let struct_tags = StructTags::from_attrs(&input.attrs)?;
    let mut columns = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let name = ident.unraw().to_string();
        let tags = FieldTags::from_attrs(&field.attrs)?;
        let field_lit = LitStr::new(&name, ident.span());
        let key = LitStr::new(&struct_tags.serialization_key(&name, &tags), ident.span());
        let column = LitStr::new(&tags.column_for(&name), ident.span());
        columns.push(quote! {
            ::trackgen::FieldColumn {
                field: #field_lit,
                key: #key,
                column: #column,
            }
        });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::trackgen::Tracked for #name #ty_generics #where_clause {
            const COLUMNS: &'static [::trackgen::FieldColumn] = &[#(#columns),*];
        }
    })
}
