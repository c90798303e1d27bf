//! Attribute macro for timing functions.
//!
//! `#[timed]` wraps a function body in `lapwatch_core::time_scope`, which
//! measures it with a fresh bench and logs the readable elapsed time through
//! `tracing`. The scope is named after the function unless a name is given:
//! `#[timed("load config")]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, ReturnType, Type, parse_macro_input};

#[proc_macro_attribute]
pub fn timed(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let scope_name = if attr.is_empty() {
        input.sig.ident.to_string()
    } else {
        parse_macro_input!(attr as LitStr).value()
    };

    if let Some(asyncness) = &input.sig.asyncness {
        return syn::Error::new_spanned(asyncness, "#[timed] does not support async functions")
            .to_compile_error()
            .into();
    }

    let ItemFn { attrs, vis, sig, block } = input;

    // annotate the closure so `?` in the body converts into the function's error type
    let closure = match &sig.output {
        ReturnType::Type(_, ty) if !matches!(**ty, Type::ImplTrait(_)) => quote! { || -> #ty #block },
        ReturnType::Default => quote! { || -> () #block },
        ReturnType::Type(..) => quote! { || #block },
    };

    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            ::lapwatch_core::time_scope(#scope_name, #closure)
        }
    };

    TokenStream::from(expanded)
}
