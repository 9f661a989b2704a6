//! Procedural macros for the db-to-json crate
//!
//! The `Shape` derive turns a record struct into a compiled field table,
//! so that binding a row never has to look up setters by name at runtime.

use proc_macro::TokenStream;

mod shape_impl;
mod utils;

#[cfg(test)]
mod tests;

/// Derive macro for record shapes
///
/// Every field must be an `Option<_>` so that unset fields can be left
/// absent. The bound name of a field defaults to the camelCase form of the
/// Rust identifier and is what incoming snake_case columns are matched
/// against.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default, Serialize, Shape)]
/// #[shape(name = "Person")]
/// struct Person {
///     #[serde(rename = "id")]
///     user_id: Option<i64>,
///
///     #[field(name = "fullName")]
///     full_name: Option<String>,
///
///     #[field(nested = "Address")]
///     address: Option<Address>,
/// }
/// ```
#[proc_macro_derive(Shape, attributes(shape, field))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    shape_impl::process_derive_shape(input)
}
