//! Derive macros for Tidings.
//!
//! - `#[derive(Action)]` - implements `tidings::Action` for enums and structs

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod action;

/// Derive macro for implementing the `Action` trait.
///
/// The kind of each enum variant is the variant name with its first letter
/// lowercased (`SetFilter` becomes `"setFilter"`). For a struct it is the
/// struct name, lowercased the same way. Either can be overridden:
///
/// ```rust,ignore
/// #[derive(Debug, Action)]
/// enum TodoAction {
///     Add { text: String },
///     #[action(kind = "clear_all")]
///     Clear,
/// }
///
/// #[derive(Debug, Action)]
/// #[action(kind = "tick")]
/// struct Heartbeat;
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    action::derive_action_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
