//! `#[derive(Action)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Ident, LitStr, Token};

/// Implementation of `#[derive(Action)]`.
pub(crate) fn derive_action_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Enum(data) => {
            if let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("action")) {
                return Err(syn::Error::new_spanned(
                    attr,
                    "put `#[action(kind = ...)]` on the variants of an enum",
                ));
            }
            if data.variants.is_empty() {
                return Err(syn::Error::new_spanned(
                    name,
                    "cannot derive `Action` for an enum without variants",
                ));
            }

            let arms = data
                .variants
                .iter()
                .map(|variant| {
                    let ident = &variant.ident;
                    let kind = kind_of(&variant.attrs, ident)?;
                    Ok(quote! { Self::#ident { .. } => #kind, })
                })
                .collect::<syn::Result<Vec<_>>>()?;

            quote! {
                ::core::option::Option::Some(match self {
                    #(#arms)*
                })
            }
        }
        Data::Struct(_) => {
            let kind = kind_of(&input.attrs, name)?;
            quote! { ::core::option::Option::Some(#kind) }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "cannot derive `Action` for a union",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::tidings::Action for #name #ty_generics #where_clause {
            fn kind(&self) -> ::core::option::Option<&str> {
                #body
            }
        }
    })
}

/// The kind from `#[action(kind = "...")]`, or the lower-camel-cased ident.
fn kind_of(attrs: &[Attribute], ident: &Ident) -> syn::Result<LitStr> {
    let mut kind = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                meta.input.parse::<Token![=]>()?;
                let lit: LitStr = meta.input.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new_spanned(&lit, "action kind cannot be empty"));
                }
                kind = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unknown attribute, expected `kind`"))
            }
        })?;
    }

    Ok(kind.unwrap_or_else(|| LitStr::new(&lower_first(&ident.to_string()), ident.span())))
}

fn lower_first(name: &str) -> String {
    let name = name.strip_prefix("r#").unwrap_or(name);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
