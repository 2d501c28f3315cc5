//! `#[derive(Bundle)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, ext::IdentExt, parse_macro_input};

/// Implementation of the `Bundle` derive macro.
pub fn derive_bundle_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    name,
                    "#[derive(Bundle)] needs named fields; use `()` for an empty bundle",
                ));
            }
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new_spanned(
                    unnamed,
                    "#[derive(Bundle)] needs named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Bundle)] can only be used on structs",
            ));
        }
    };

    let mut keys: Vec<String> = Vec::new();
    let mut arms = Vec::new();
    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };

        let mut key = ident.unraw().to_string();
        let mut skip = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("bundle")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    key = lit.value();
                    Ok(())
                } else {
                    Err(meta.error("unknown bundle attribute; expected `rename` or `skip`"))
                }
            })?;
        }

        if skip {
            continue;
        }
        if keys.contains(&key) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("duplicate bundle field `{key}`"),
            ));
        }

        arms.push(quote! {
            #key => ::core::option::Option::Some(::tidings::ToValue::to_value(&self.#ident)),
        });
        keys.push(key);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tidings::Bundle for #name #ty_generics #where_clause {
            fn field(&self, __name: &str) -> ::core::option::Option<::tidings::Value> {
                match __name {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
