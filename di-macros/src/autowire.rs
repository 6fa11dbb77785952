//! Implementation of #[derive(Autowire)] proc-macro.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Field, Fields, GenericArgument, LitStr, PathArguments,
    Type,
};

pub fn derive_autowire_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Some(&fields.named),
            Fields::Unit => None,
            Fields::Unnamed(_) => {
                return syn::Error::new_spanned(
                    &input,
                    "Autowire can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Autowire can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let body = match fields {
        None => quote! { Self },
        Some(fields) => {
            let mut inits = Vec::with_capacity(fields.len());
            for field in fields {
                match field_init(field) {
                    Ok(init) => inits.push(init),
                    Err(err) => return err.to_compile_error().into(),
                }
            }
            quote! { Self { #(#inits),* } }
        }
    };

    let expanded = quote! {
        impl #impl_generics ::tether::Autowire for #name #ty_generics #where_clause {
            fn autowire(
                container: &::tether::Container,
            ) -> ::std::result::Result<Self, ::tether::ContainerError> {
                ::std::result::Result::Ok(#body)
            }
        }
    };

    TokenStream::from(expanded)
}

/// Builds `field: container.get::<T>("key")?` for an `Arc<T>` field.
fn field_init(field: &Field) -> syn::Result<proc_macro2::TokenStream> {
    let field_name = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    let key = match parse_inject_key(field)? {
        Some(key) => key,
        None => field_name.to_string(),
    };
    let inner = arc_inner(&field.ty).ok_or_else(|| {
        syn::Error::new_spanned(&field.ty, "Autowire fields must have type Arc<T>")
    })?;

    Ok(quote! {
        #field_name: container.get::<#inner>(#key)?
    })
}

fn parse_inject_key(field: &Field) -> syn::Result<Option<String>> {
    for attr in &field.attrs {
        if attr.path().is_ident("inject") {
            // #[inject("service-name")]
            let key: LitStr = attr.parse_args()?;
            return Ok(Some(key.value()));
        }
    }
    Ok(None)
}

fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
