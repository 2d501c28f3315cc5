//! # tidings-macros
//!
//! Procedural macros for the Tidings notification registry.
//!
//! - `#[handlers]` - Declares the notification handlers of a type
//! - `#[derive(Bundle)]` - Makes a struct usable as a notification bundle
//!
//! Use them through the `tidings` crate, which re-exports both.

use proc_macro::TokenStream;

mod bundle;
mod handlers;

/// Attribute macro implementing `Introspect` from an inherent `impl` block.
///
/// Every method tagged with one or more `#[notification("tag")]` attributes
/// becomes a handler for those tags. Methods must take `&self` and may be
/// `async`. Each remaining parameter binds to the bundle field of the same
/// name, or to the name given by `#[field("name")]` on the parameter.
///
/// # Example
///
/// ```rust,ignore
/// struct Mailer;
///
/// #[tidings::handlers]
/// impl Mailer {
///     #[notification("user.joined")]
///     async fn welcome(&self, name: String, #[field("e-mail")] email: Option<String>) {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn handlers(attr: TokenStream, item: TokenStream) -> TokenStream {
    handlers::handlers_impl(attr, item)
}

/// Derive macro implementing `Bundle` for a struct with named fields.
///
/// Each field is exposed under its Rust name. Use `#[bundle(rename = "name")]`
/// to expose it under another name, or `#[bundle(skip)]` to hide it.
#[proc_macro_derive(Bundle, attributes(bundle))]
pub fn derive_bundle(input: TokenStream) -> TokenStream {
    bundle::derive_bundle_impl(input)
}
