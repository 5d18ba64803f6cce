//! Proc-Macros implementations for slack-di

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod component;

/// Derive macro for the `Component` trait
///
/// Every named field becomes a constructor parameter named after the field,
/// in declaration order:
/// - `Arc<T>` fields are required and receive the shared instance
/// - `Option<Arc<T>>` and `Option<T>` fields default to `None`
/// - `#[component(default)]` fields default to `Default::default()`
/// - any other field is required and cloned out of the supplied value
///
/// `#[component(name = "...")]` matches a different parameter name.
///
/// # Example
/// ```ignore
/// use std::sync::Arc;
/// use slack_di::Component;
///
/// #[derive(Component)]
/// struct Mailer {
///     transport: Arc<Transport>,
///     #[component(name = "mail_from")]
///     from: String,
///     #[component(default)]
///     retries: u32,
///     signature: Option<String>,
/// }
///
/// // This expands to:
/// // impl Component for Mailer {
/// //     const PARAMS: &'static [Param] = &[
/// //         Param::required("transport").of_type("Arc<Transport>"),
/// //         Param::required("mail_from").of_type("String"),
/// //         Param::optional("retries").of_type("u32"),
/// //         Param::optional("signature").of_type("Option<String>"),
/// //     ];
/// //     fn construct(args: Args) -> Result<Self, Error> {
/// //         Ok(Self {
/// //             transport: args.get::<Transport>("transport")?,
/// //             from: args.get_cloned::<String>("mail_from")?,
/// //             retries: args.opt_cloned::<u32>("retries")?.unwrap_or_default(),
/// //             signature: args.opt_cloned::<String>("signature")?,
/// //         })
/// //     }
/// // }
/// ```
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    component::expand_component(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
