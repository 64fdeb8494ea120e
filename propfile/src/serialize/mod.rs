//! Mapping between property stores and typed records.
//!
//! A record maps through two trait layers. [`FromPropertyValue`] and
//! [`ToPropertyValue`] convert one value between its string form and a
//! Rust type. [`FromProperties`] and [`ToProperties`] convert a whole
//! record; implement them by hand or derive them with
//! `propfile_derive::{FromProperties, ToProperties}` and steer individual
//! fields with `#[property(rename = "...")]`, `#[property(ignore)]`, and
//! `#[property(with = "SomeConverter")]`.

use crate::{error::Error, file::LoadOptions, PropertyFile};
use std::{io::Write, path::Path};

#[cfg(test)]
mod tests;

/// Parse one property value into a typed field.
pub trait FromPropertyValue: Sized {
    /// `None` if the value cannot be represented; the mapper turns that
    /// into an [`Error::Conversion`] naming the field.
    #[must_use]
    fn from_property_value(value: &str) -> Option<Self>;
}

/// Render one typed field as a property value.
pub trait ToPropertyValue {
    /// `None` omits the property from the output entirely.
    #[must_use]
    fn to_property_value(&self) -> Option<String>;
}

macro_rules! impl_property_value_primitive {
    ($($prim:ty),+) => {$(
        impl FromPropertyValue for $prim {
            fn from_property_value(value: &str) -> Option<Self> {
                value.trim().parse().ok()
            }
        }

        impl ToPropertyValue for $prim {
            fn to_property_value(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
    )+};
}

impl_property_value_primitive!(
    u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize, f32, f64
);

impl FromPropertyValue for bool {
    fn from_property_value(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl ToPropertyValue for bool {
    fn to_property_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FromPropertyValue for char {
    fn from_property_value(value: &str) -> Option<Self> {
        let mut chars = value.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl ToPropertyValue for char {
    fn to_property_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FromPropertyValue for String {
    fn from_property_value(value: &str) -> Option<Self> {
        Some(value.to_owned())
    }
}

impl ToPropertyValue for String {
    fn to_property_value(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ToPropertyValue for str {
    fn to_property_value(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl<T> FromPropertyValue for Option<T>
where
    T: FromPropertyValue,
{
    fn from_property_value(value: &str) -> Option<Self> {
        T::from_property_value(value).map(Some)
    }
}

impl<T> ToPropertyValue for Option<T>
where
    T: ToPropertyValue,
{
    fn to_property_value(&self) -> Option<String> {
        self.as_ref().and_then(ToPropertyValue::to_property_value)
    }
}

/// Serialize a record into a property store.
pub trait ToProperties {
    #[must_use]
    fn to_properties(&self) -> PropertyFile;
}

/// Build a record back out of a property store.
///
/// Fields the store has no value for keep their [`Default`] value and are
/// reported in the warning list; callers wanting strict-missing-field
/// behavior reject a non-empty list. A value that fails conversion is a
/// fatal [`Error::Conversion`].
pub trait FromProperties: Default + Sized {
    fn from_properties(file: &PropertyFile) -> Result<(Self, Vec<MappingWarning>), Error>;
}

/// A custom string transform for one field, bound with
/// `#[property(with = ...)]`. Instantiated through [`Default`] at each
/// use.
pub trait PropertyConverter: Default {
    type Value;

    /// `None` omits the property from the output.
    #[must_use]
    fn to_property(&self, value: &Self::Value) -> Option<String>;

    /// `None` is a conversion failure, fatal to the mapping call.
    #[must_use]
    fn from_property(&self, value: &str) -> Option<Self::Value>;
}

/// A field the store could not supply a value for; the field kept its
/// default.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MappingWarning {
    pub field: &'static str,
    pub kind: MappingWarningKind,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MappingWarningKind {
    /// No property with the field's name.
    MissingValue,
    /// The property exists but its value is logically absent.
    NullValue,
}

/// Serialize `value` into a fresh store.
#[must_use]
pub fn serialize<T: ToProperties>(value: &T) -> PropertyFile {
    value.to_properties()
}

/// Serialize `value` and write it to `writer` as UTF-8.
pub fn serialize_to_writer<T: ToProperties>(value: &T, writer: impl Write) -> Result<(), Error> {
    value.to_properties().save_writer(writer)
}

/// Serialize `value` and write it to `path` as UTF-8.
pub fn serialize_to_path<T: ToProperties>(value: &T, path: impl AsRef<Path>) -> Result<(), Error> {
    value.to_properties().save_path(path)
}

/// Map a loaded store into a record.
pub fn deserialize<T: FromProperties>(file: &PropertyFile) -> Result<(T, Vec<MappingWarning>), Error> {
    T::from_properties(file)
}

/// Strictly parse `input` and map it into a record.
pub fn deserialize_str<T: FromProperties>(input: &str) -> Result<(T, Vec<MappingWarning>), Error> {
    let mut file = PropertyFile::new();
    file.load_str(input, LoadOptions::default())?;
    T::from_properties(&file)
}

/// Strictly load `path` and map it into a record.
pub fn deserialize_from_path<T: FromProperties>(
    path: impl AsRef<Path>,
) -> Result<(T, Vec<MappingWarning>), Error> {
    let file = PropertyFile::open(path)?;
    T::from_properties(&file)
}
