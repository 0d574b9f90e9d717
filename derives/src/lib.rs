//! Derive macro for wireup
//!
//! `#[derive(Component)]` turns a struct whose fields are all `Arc<_>` into a
//! `wireup::Component`. Each field is one constructor parameter, in
//! declaration order.
//!
//! - `Arc<T>` depends on the component `T`.
//! - `#[inject(U)] field: Arc<dyn Trait>` depends on the component `U` and
//!   receives whatever the container built for it, viewed as `dyn Trait`.
//! - `#[component(export(dyn Trait, ...))]` on the struct lets consumers view
//!   this component as those interfaces.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, quote_spanned};
use syn::parse::Parse;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Data, DeriveInput, Field, Fields, GenericArgument, PathArguments, Type,
};

#[proc_macro_derive(Component, attributes(inject, component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

/// One constructor parameter.
struct Param {
    /// Component the container resolves.
    dependency: Type,
    /// Type the consumer receives, `T` in `Arc<T>`.
    received: Type,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let interfaces = parse_exports(&input)?;

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Component can only be derived for structs",
            ))
        }
    };

    let params = data
        .fields
        .iter()
        .map(parse_param)
        .collect::<syn::Result<Vec<_>>>()?;

    let dependencies = params.iter().map(|p| {
        let dependency = &p.dependency;
        quote_spanned! {dependency.span()=> ::wireup::Token::of::<#dependency>() }
    });

    let args = if params.is_empty() {
        format_ident!("_args")
    } else {
        format_ident!("args")
    };
    let values = params.iter().map(|p| {
        let received = &p.received;
        quote! { #args.next::<#received>()? }
    });
    let body = match &data.fields {
        Fields::Named(fields) => {
            let idents = fields.named.iter().map(|f| &f.ident);
            quote! { Self { #(#idents: #values,)* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#values,)*) },
        Fields::Unit => quote! { Self },
    };

    let exports_fn = if interfaces.is_empty() {
        quote! {}
    } else {
        quote! {
            fn exports(exports: &mut ::wireup::Exports<Self>) {
                #(exports.export::<#interfaces>(|this| this);)*
            }
        }
    };

    Ok(quote! {
        impl #impl_generics ::wireup::Component for #name #ty_generics #where_clause {
            fn dependencies() -> ::std::vec::Vec<::wireup::Token> {
                ::std::vec![#(#dependencies),*]
            }

            fn construct(#args: &mut ::wireup::Args) -> ::wireup::anyhow::Result<Self> {
                ::std::result::Result::Ok(#body)
            }

            #exports_fn
        }
    })
}

fn parse_param(field: &Field) -> syn::Result<Param> {
    let received = arc_inner(&field.ty).ok_or_else(|| {
        syn::Error::new_spanned(&field.ty, "component fields must be `Arc<_>`")
    })?;

    let mut dependency = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("inject")) {
        if dependency.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[inject] attribute"));
        }
        dependency = Some(attr.parse_args::<Type>()?);
    }

    let dependency = match dependency {
        Some(dependency) => dependency,
        None if matches!(received, Type::TraitObject(_)) => {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "trait object fields need #[inject(Component)] to name the implementation",
            ))
        }
        None => received.clone(),
    };

    Ok(Param {
        dependency,
        received: received.clone(),
    })
}

/// `T` for a type spelled `Arc<T>`, `sync::Arc<T>` or `std::sync::Arc<T>`.
fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(generics) = &segment.arguments else {
        return None;
    };
    match generics.args.first() {
        Some(GenericArgument::Type(inner)) if generics.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn parse_exports(input: &DeriveInput) -> syn::Result<Vec<Type>> {
    let mut exports = Vec::new();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("component")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("export") {
                let content;
                syn::parenthesized!(content in meta.input);
                let types = content.parse_terminated(Type::parse, syn::Token![,])?;
                exports.extend(types);
                Ok(())
            } else {
                Err(meta.error("unsupported component attribute, expected `export(...)`"))
            }
        })?;
    }
    Ok(exports)
}
