//! A flat store whose values are parsed to one type.

use crate::{
    encoding,
    error::Error,
    file::{read_text, LoadOptions},
    parse::{parse_line, Line, MalformedKind},
    serialize::{FromPropertyValue, ToPropertyValue},
    write::write_property,
};
use encoding_rs::Encoding;
use indexmap::IndexMap;
use std::{
    fmt, fs,
    io::{Read, Write},
    path::Path,
    str::FromStr,
};

/// A flat property file whose values all share one Rust type.
///
/// Values are parsed through [`FromPropertyValue`] as the file loads; a
/// value the type cannot represent is a fatal [`Error::Conversion`]
/// naming the property. On save, values render through
/// [`ToPropertyValue`]; a value that renders as `None` is omitted.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TypedPropertyFile<T> {
    properties: IndexMap<String, T>,
}

impl<T> TypedPropertyFile<T> {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.properties.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: T) {
        self.properties.insert(name.into(), value);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.properties.shift_remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<T: FromPropertyValue> TypedPropertyFile<T> {
    /// Load `path` with default [`LoadOptions`]. Strict: both malformed
    /// lines and unparseable values abort the load.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with(path, LoadOptions::default())
    }

    /// Load `path` with the given options. `empty_is_null` has no
    /// meaning here; an empty value reaches the type's parser as `""`.
    pub fn open_with(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self, Error> {
        let mut file = Self::new();
        file.load_path(path, options)?;
        Ok(file)
    }

    /// Read a store out of `reader`.
    pub fn from_reader(reader: impl Read, options: LoadOptions) -> Result<Self, Error> {
        let mut file = Self::new();
        file.load_reader(reader, options)?;
        Ok(file)
    }

    /// Parse `input`, converting every value to `T`.
    pub fn load_str(&mut self, input: &str, options: LoadOptions) -> Result<(), Error> {
        if options.clear {
            self.properties.clear();
        }
        for line in input.lines() {
            match parse_line(line) {
                Line::Blank | Line::Comment => {}
                Line::Entry { name, value } => match T::from_property_value(value) {
                    Some(parsed) => {
                        self.properties.insert(name.to_owned(), parsed);
                    }
                    None => return Err(Error::conversion(name, value)),
                },
                Line::Malformed {
                    raw,
                    kind: MalformedKind::UnterminatedGroup,
                } => return Err(Error::invalid_group(raw)),
                // Typed files are flat: group headers are as malformed
                // as an operator-less line
                Line::Group { .. } | Line::Malformed { .. } => {
                    return Err(Error::invalid_property(line))
                }
            }
        }
        Ok(())
    }

    /// Strictly load `reader`, decoding per `options.encoding`.
    pub fn load_reader(&mut self, reader: impl Read, options: LoadOptions) -> Result<(), Error> {
        let text = read_text(reader, options.encoding)?;
        self.load_str(&text, options)
    }

    /// Strictly load the file at `path`.
    pub fn load_path(&mut self, path: impl AsRef<Path>, options: LoadOptions) -> Result<(), Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading typed property file");
        self.load_reader(fs::File::open(path)?, options)
    }
}

impl<T: ToPropertyValue> TypedPropertyFile<T> {
    /// Write the store to `writer` as UTF-8.
    pub fn save_writer(&self, writer: impl Write) -> Result<(), Error> {
        self.save_writer_with(writer, encoding_rs::UTF_8)
    }

    /// Write the store to `writer` in the given encoding.
    pub fn save_writer_with(
        &self,
        mut writer: impl Write,
        encoding: &'static Encoding,
    ) -> Result<(), Error> {
        let text = self.to_string();
        writer.write_all(&encoding::encode(&text, encoding))?;
        Ok(())
    }

    /// Save to `path` as UTF-8, replacing the file's contents.
    pub fn save_path(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.save_path_with(path, encoding_rs::UTF_8)
    }

    /// Save to `path` in the given encoding.
    pub fn save_path_with(
        &self,
        path: impl AsRef<Path>,
        encoding: &'static Encoding,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), properties = self.len(), "saving typed property file");
        self.save_writer_with(fs::File::create(path)?, encoding)
    }
}

impl<T: ToPropertyValue> fmt::Display for TypedPropertyFile<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            if let Some(rendered) = value.to_property_value() {
                write_property(f, name, Some(&rendered))?;
            }
        }
        Ok(())
    }
}

impl<T: FromPropertyValue> FromStr for TypedPropertyFile<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut file = Self::new();
        file.load_str(s, LoadOptions::default())?;
        Ok(file)
    }
}

impl<T> Extend<(String, T)> for TypedPropertyFile<T> {
    fn extend<I: IntoIterator<Item = (String, T)>>(&mut self, iter: I) {
        self.properties.extend(iter);
    }
}

impl<T> FromIterator<(String, T)> for TypedPropertyFile<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}
