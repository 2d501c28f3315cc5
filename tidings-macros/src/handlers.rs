//! The `#[handlers]` attribute.
//!
//! Expands an inherent `impl` block into itself plus an `Introspect`
//! implementation listing each `#[notification]` method.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{
    Attribute, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Pat, Receiver, Type,
    ext::IdentExt, parse_macro_input, spanned::Spanned,
};

/// Largest handler arity `FromArguments` is implemented for.
const MAX_PARAMS: usize = 12;

/// Implementation of the `#[handlers]` attribute macro.
pub fn handlers_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::TokenStream::from(attr).span(),
            "#[handlers] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut input = parse_macro_input!(item as ItemImpl);
    match expand(&mut input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// One declared handler method.
struct HandlerMethod {
    tags: Vec<LitStr>,
    ident: Ident,
    is_async: bool,
    params: Vec<(String, Type)>,
}

fn expand(input: &mut ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[handlers] must be placed on an inherent impl block",
        ));
    }

    let mut methods = Vec::new();
    for item in &mut input.items {
        if let ImplItem::Fn(method) = item {
            if let Some(handler) = take_handler(method)? {
                methods.push(handler);
            }
        }
    }

    let registrations: Vec<_> = methods
        .iter()
        .flat_map(|method| {
            let ident = &method.ident;
            let name = ident.unraw().to_string();
            let names: Vec<_> = method.params.iter().map(|(n, _)| n).collect();
            let types: Vec<_> = method.params.iter().map(|(_, t)| t).collect();
            let args: Vec<_> = (0..method.params.len())
                .map(|i| format_ident!("__arg{}", i))
                .collect();

            let body = if method.is_async {
                quote! { async move { Self::#ident(&*__target, #(#args),*).await } }
            } else {
                quote! { ::core::future::ready(Self::#ident(&*__target, #(#args),*)) }
            };

            method
                .tags
                .iter()
                .map(|tag| {
                    quote! {
                        .on(
                            #tag,
                            #name,
                            &[#(#names),*],
                            |__target: ::std::sync::Arc<Self>, (#(#args,)*): (#(#types,)*)| #body,
                        )
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics ::tidings::Introspect for #self_ty #where_clause {
            fn introspect(
                __target: &::std::sync::Arc<Self>,
            ) -> ::std::vec::Vec<::tidings::HandlerDescriptor> {
                ::tidings::HandlerTable::new(__target)
                    #(#registrations)*
                    .build()
            }
        }
    })
}

/// Strips the handler attributes from `method`, returning its declaration if
/// it carries any `#[notification]`.
fn take_handler(method: &mut ImplItemFn) -> syn::Result<Option<HandlerMethod>> {
    let mut tags = Vec::new();
    let mut kept = Vec::with_capacity(method.attrs.len());
    for attr in method.attrs.drain(..) {
        if attr.path().is_ident("notification") {
            tags.push(attr.parse_args::<LitStr>()?);
        } else {
            kept.push(attr);
        }
    }
    method.attrs = kept;

    if tags.is_empty() {
        return Ok(None);
    }

    let sig = &mut method.sig;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "notification handlers cannot be generic",
        ));
    }

    let mut inputs = sig.inputs.iter_mut();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if is_shared_ref(receiver) => {}
        Some(other) => {
            return Err(syn::Error::new_spanned(
                other,
                "notification handlers must take `&self` or `self: &Self`",
            ));
        }
        None => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "notification handlers must take `&self` or `self: &Self`",
            ));
        }
    }

    let mut params = Vec::new();
    for arg in inputs {
        let FnArg::Typed(pat_type) = arg else {
            return Err(syn::Error::new_spanned(arg, "unexpected receiver"));
        };
        let renamed = take_field_name(&mut pat_type.attrs)?;
        let name = match (renamed, &*pat_type.pat) {
            (Some(name), _) => name,
            (None, Pat::Ident(pat)) => pat.ident.unraw().to_string(),
            (None, other) => {
                return Err(syn::Error::new_spanned(
                    other,
                    "name this parameter's field with #[field(\"name\")]",
                ));
            }
        };
        params.push((name, (*pat_type.ty).clone()));
    }

    if params.len() > MAX_PARAMS {
        return Err(syn::Error::new(
            Span::call_site(),
            format!(
                "`{}` takes {} parameters; handlers take at most {}",
                sig.ident,
                params.len(),
                MAX_PARAMS
            ),
        ));
    }

    Ok(Some(HandlerMethod {
        tags,
        ident: sig.ident.clone(),
        is_async: sig.asyncness.is_some(),
        params,
    }))
}

/// Accepts `&self` and `self: &Self`.
fn is_shared_ref(receiver: &Receiver) -> bool {
    if receiver.colon_token.is_none() {
        return receiver.reference.is_some() && receiver.mutability.is_none();
    }
    match &*receiver.ty {
        Type::Reference(reference) => {
            reference.mutability.is_none()
                && matches!(&*reference.elem, Type::Path(path) if path.qself.is_none() && path.path.is_ident("Self"))
        }
        _ => false,
    }
}

/// Removes `#[field("name")]` from a parameter's attributes.
fn take_field_name(attrs: &mut Vec<Attribute>) -> syn::Result<Option<String>> {
    let mut name = None;
    let mut error = None;
    attrs.retain(|attr| {
        if !attr.path().is_ident("field") {
            return true;
        }
        match attr.parse_args::<LitStr>() {
            Ok(lit) if name.is_none() => name = Some(lit.value()),
            Ok(lit) => {
                error = Some(syn::Error::new_spanned(lit, "duplicate #[field] attribute"));
            }
            Err(err) => error = Some(err),
        }
        false
    });

    match error {
        Some(err) => Err(err),
        None => Ok(name),
    }
}
