//! Autowiring derive macro for the tether service container.
//!
//! `#[derive(Autowire)]` implements `tether::Autowire` for a struct whose
//! fields are all `Arc<T>`. Each field is resolved from the container by
//! name; the generated code references `::tether::Autowire`,
//! `::tether::Container` and `::tether::ContainerError`.

use proc_macro::TokenStream;

mod autowire;

/// Derive macro for types that can be built from a container.
///
/// Every field is resolved with `container.get::<T>(key)`, where `key`
/// defaults to the field name and can be overridden with `#[inject("key")]`.
///
/// # Requirements
///
/// - Named fields only (unit structs are accepted and built as-is)
/// - Every field must be an `Arc<T>` with `T: Send + Sync + 'static`
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use tether::framework::Router;
/// use tether::{Autowire, Settings};
///
/// #[derive(Autowire)]
/// pub struct HomeController {
///     settings: Arc<Settings>, // container.get::<Settings>("settings")
///     #[inject("router")]
///     routes: Arc<Router>,     // container.get::<Router>("router")
/// }
/// ```
#[proc_macro_derive(Autowire, attributes(inject))]
pub fn derive_autowire(input: TokenStream) -> TokenStream {
    autowire::derive_autowire_impl(input)
}
