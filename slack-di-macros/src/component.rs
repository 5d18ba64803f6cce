//! Macros for component construction

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// How a field is filled from the call arguments
enum Kind<'a> {
    /// `Arc<T>`
    Shared(&'a Type),
    /// `Option<Arc<T>>`
    OptionalShared(&'a Type),
    /// `Option<T>`
    Optional(&'a Type),
    /// `#[component(default)] Arc<T>`
    DefaultShared(&'a Type),
    /// `#[component(default)] T`
    Default(&'a Type),
    /// `T`
    Cloned(&'a Type),
}

struct Field<'a> {
    ident: &'a syn::Ident,
    param: String,
    ty: &'a Type,
    kind: Kind<'a>,
}

impl<'a> Field<'a> {
    fn parse(field: &'a syn::Field) -> syn::Result<Self> {
        let ident = field.ident.as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "component parameters must be named"))?;

        let mut param = ident.to_string();
        let mut default = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("component")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    default = true;
                    Ok(())
                } else if meta.path.is_ident("name") {
                    let name: syn::LitStr = meta.value()?.parse()?;
                    param = name.value();
                    Ok(())
                } else {
                    Err(meta.error("expected `default` or `name = \"...\"`"))
                }
            })?;
        }

        let ty = &field.ty;
        let kind = match (default, generic_arg(ty, "Option"), generic_arg(ty, "Arc")) {
            (true, _, Some(inner)) => Kind::DefaultShared(inner),
            (true, _, None) => Kind::Default(ty),
            (false, Some(inner), _) => match generic_arg(inner, "Arc") {
                Some(shared) => Kind::OptionalShared(shared),
                None => Kind::Optional(inner),
            },
            (false, None, Some(inner)) => Kind::Shared(inner),
            (false, None, None) => Kind::Cloned(ty),
        };
        Ok(Self { ident, param, ty, kind })
    }

    fn descriptor(&self) -> TokenStream {
        let param = &self.param;
        let ty = self.ty;
        match self.kind {
            Kind::Shared(_) | Kind::Cloned(_) => quote! {
                ::slack_di::Param::required(#param).of_type(::core::stringify!(#ty))
            },
            _ => quote! {
                ::slack_di::Param::optional(#param).of_type(::core::stringify!(#ty))
            },
        }
    }

    fn initializer(&self) -> TokenStream {
        let ident = self.ident;
        let param = &self.param;
        let value = match self.kind {
            Kind::Shared(inner) => quote! { args.get::<#inner>(#param)? },
            Kind::OptionalShared(inner) => quote! { args.opt::<#inner>(#param)? },
            Kind::Optional(inner) => quote! { args.opt_cloned::<#inner>(#param)? },
            Kind::DefaultShared(inner) => quote! { args.opt::<#inner>(#param)?.unwrap_or_default() },
            Kind::Default(ty) => quote! { args.opt_cloned::<#ty>(#param)?.unwrap_or_default() },
            Kind::Cloned(ty) => quote! { args.get_cloned::<#ty>(#param)? },
        };
        quote! { #ident: #value }
    }
}

/// Returns `T` if `ty` is `wrapper<T>`
fn generic_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match (args.args.len(), args.args.first()?) {
        (1, GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// Expands a derive-macro for a component
pub(super) fn expand_component(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let syn::Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(name, "Component can only be derived for structs"));
    };

    let (fields, body) = match &data.fields {
        syn::Fields::Named(named) => {
            let fields = named.named
                .iter()
                .map(Field::parse)
                .collect::<syn::Result<Vec<_>>>()?;
            let inits = fields.iter().map(Field::initializer);
            let body = quote! { Self { #(#inits,)* } };
            (fields, body)
        }
        syn::Fields::Unit => (Vec::new(), quote! { Self }),
        syn::Fields::Unnamed(unnamed) => {
            return Err(syn::Error::new_spanned(
                unnamed,
                "Component parameters are matched by name, use a struct with named fields",
            ));
        }
    };
    let params = fields.iter().map(Field::descriptor);

    Ok(quote! {
        impl #impl_generics ::slack_di::Component for #name #ty_generics #where_clause {
            const PARAMS: &'static [::slack_di::Param] = &[#(#params),*];

            #[inline]
            #[allow(unused_variables)]
            fn construct(args: ::slack_di::Args) -> ::core::result::Result<Self, ::slack_di::error::Error> {
                ::core::result::Result::Ok(#body)
            }
        }
    })
}
