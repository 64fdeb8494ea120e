//! Parser, writer, and record mapper for the .property configuration
//! format.
//!
//! A .property file is a line-oriented list of named values:
//!
//! ```property
//! # greeting settings
//! message = Hello, World!
//! padding ~    four leading spaces, preserved
//! [network]
//! port = 8080
//! ```
//!
//! `=` trims its value so entries can be aligned; `~` keeps the value
//! byte-for-byte from the character after the operator. [`PropertyFile`]
//! holds a flat file, [`GroupedPropertyFile`] understands `[group]`
//! headers, and [`TypedPropertyFile`] parses every value to one type.
//! The [`serialize`] module maps stores to and from plain structs.

#![warn(unused)]
#![deny(nonstandard_style)]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

// The derive macros emit `::propfile::` paths; make them resolve inside
// this crate's own tests as well.
#[cfg(test)]
extern crate self as propfile;

pub use error::Error;
pub use file::{GroupedPropertyFile, Iter, LoadOptions, PropertyFile, TypedPropertyFile};

mod encoding;
pub mod error;
mod file;
pub mod parse;
pub mod serialize;
mod write;
