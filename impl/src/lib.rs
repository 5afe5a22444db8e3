extern crate proc_macro;
extern crate syn;
#[macro_use]
extern crate quote;
use proc_macro::TokenStream;
use syn::parse_macro_input;

/// Records the whole body of the annotated function as one scope on the global session.
///
/// The scope is named after the function, or after `name` when given:
/// `#[profile]` or `#[profile(name = "decode")]`.
#[proc_macro_attribute]
pub fn profile(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as syn::AttributeArgs);
    let item_fn = parse_macro_input!(input as syn::ItemFn);

    let scope_name = match args.first() {
        Some(meta) => get_scope_name(meta)
            .expect("profile attribute only accepts #[profile(name = \"scope name\")]")
            .value(),
        None => item_fn.sig.ident.to_string(),
    };
    if args.len() > 1 {
        panic!("profile attribute only accepts a single `name` argument");
    }

    let syn::ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = item_fn;

    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            scopetrace::profile_scope!(#scope_name);
            #block
        }
    };

    expanded.into()
}

fn get_scope_name(meta: &syn::NestedMeta) -> Option<syn::LitStr> {
    let meta = if let syn::NestedMeta::Meta(m) = meta {
        m
    } else {
        return None;
    };

    let name_value = if let syn::Meta::NameValue(v) = meta {
        v
    } else {
        return None;
    };

    if !name_value.path.is_ident("name") {
        return None;
    }

    if let syn::Lit::Str(v) = name_value.lit.clone() {
        Some(v)
    } else {
        None
    }
}
