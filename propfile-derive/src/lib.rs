//! Derive macros for propfile's mapping traits.

#![warn(unused)]
#![deny(nonstandard_style)]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

use proc_macro::TokenStream;

mod helpers;
mod properties;

/// Derive `propfile::serialize::ToProperties` for a struct with named
/// fields.
///
/// Field attributes:
/// - `#[property(rename = "external name")]` — the name used in the
///   file; defaults to the field's own identifier. Must not contain `=`
///   or `~`.
/// - `#[property(ignore)]` — never serialized.
/// - `#[property(with = "SomeConverter")]` — route the value through a
///   `PropertyConverter` type instead of `ToPropertyValue`.
#[proc_macro_derive(ToProperties, attributes(property))]
pub fn to_properties(input: TokenStream) -> TokenStream {
    properties::to_properties(input)
}

/// Derive `propfile::serialize::FromProperties` for a struct with named
/// fields. The struct must implement `Default`; fields without a usable
/// value keep their default and are reported as warnings.
///
/// Takes the same `#[property(...)]` attributes as
/// [`ToProperties`](macro@ToProperties).
#[proc_macro_derive(FromProperties, attributes(property))]
pub fn from_properties(input: TokenStream) -> TokenStream {
    properties::from_properties(input)
}
