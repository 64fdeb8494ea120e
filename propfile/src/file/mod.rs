//! Property stores and their load/save surface.
//!
//! [`PropertyFile`] is the flat store: one scope, name → value, insertion
//! order preserved. [`GroupedPropertyFile`] adds one level of `[group]`
//! scopes on top. [`TypedPropertyFile`] is a flat store whose values are
//! parsed to a single type at load time.

use crate::{
    encoding,
    error::Error,
    parse::{parse_line, Line, MalformedKind},
    write::write_property,
};
use encoding_rs::Encoding;
use indexmap::IndexMap;
use std::{
    fmt, fs,
    io::{Read, Write},
    ops,
    path::Path,
    str::FromStr,
};

pub use grouped::GroupedPropertyFile;
pub use typed::TypedPropertyFile;

mod grouped;
mod typed;

/// Per-call knobs for the loaders.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Discard the store's current contents before loading. When `false`,
    /// loaded entries overwrite same-named existing ones and everything
    /// else is retained.
    pub clear: bool,
    /// Store entries whose value has zero length as logically absent
    /// instead of as the empty string.
    pub empty_is_null: bool,
    /// Text encoding of the input bytes. `None` detects one (BOM first,
    /// then content sniffing). Ignored by the `*_str` loaders.
    pub encoding: Option<&'static Encoding>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            clear: true,
            empty_is_null: false,
            encoding: None,
        }
    }
}

/// A flat property file: an insertion-ordered mapping from property name
/// to value.
///
/// Names are unique and case sensitive; setting an existing name replaces
/// its value in place (last write wins). A value may be logically absent,
/// which [`get`](Self::get) reports the same way as a missing name; use
/// [`contains`](Self::contains) to tell the two apart.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PropertyFile {
    properties: IndexMap<String, Option<String>>,
}

impl PropertyFile {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` with default [`LoadOptions`]. Strict: the first
    /// malformed line aborts the load.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with(path, LoadOptions::default())
    }

    /// Load `path` with the given options.
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

    /// A property's value.
    ///
    /// Returns `None` both when no property has this name and when the
    /// property's value is logically absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Option::as_deref)
    }

    /// Set a property's value, inserting the property if it is new.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), Some(value.into()));
    }

    /// Set a property to the logically-absent value.
    pub fn set_null(&mut self, name: impl Into<String>) {
        self.properties.insert(name.into(), None);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Remove a property, preserving the order of the rest. Returns
    /// whether the property existed.
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
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.properties.iter(),
        }
    }

    /// Parse `input`, strict mode: the first malformed line aborts with
    /// an error describing it. Group headers are malformed here; a flat
    /// store cannot represent them.
    pub fn load_str(&mut self, input: &str, options: LoadOptions) -> Result<(), Error> {
        self.load_lines(input, options, true).map(|_clean| ())
    }

    /// Parse `input`, best effort: malformed lines are skipped and every
    /// valid line is kept. Returns `true` only if nothing was skipped.
    pub fn try_load_str(&mut self, input: &str, options: LoadOptions) -> bool {
        self.load_lines(input, options, false).unwrap_or(false)
    }

    /// Strictly load `reader`, decoding per `options.encoding`.
    pub fn load_reader(&mut self, reader: impl Read, options: LoadOptions) -> Result<(), Error> {
        let text = read_text(reader, options.encoding)?;
        self.load_str(&text, options)
    }

    /// Best-effort [`load_reader`](Self::load_reader); read failures also
    /// yield `false`.
    pub fn try_load_reader(&mut self, reader: impl Read, options: LoadOptions) -> bool {
        match read_text(reader, options.encoding) {
            Ok(text) => self.try_load_str(&text, options),
            Err(error) => {
                tracing::warn!(%error, "failed to read property stream");
                false
            }
        }
    }

    /// Strictly load the file at `path`.
    pub fn load_path(&mut self, path: impl AsRef<Path>, options: LoadOptions) -> Result<(), Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading property file");
        self.load_reader(fs::File::open(path)?, options)
    }

    /// Best-effort [`load_path`](Self::load_path).
    pub fn try_load_path(&mut self, path: impl AsRef<Path>, options: LoadOptions) -> bool {
        match fs::File::open(path.as_ref()) {
            Ok(file) => self.try_load_reader(file, options),
            Err(error) => {
                tracing::warn!(%error, path = %path.as_ref().display(), "failed to open property file");
                false
            }
        }
    }

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
        tracing::debug!(path = %path.display(), properties = self.len(), "saving property file");
        self.save_writer_with(fs::File::create(path)?, encoding)
    }

    /// [`save_writer`](Self::save_writer), reporting failure as `false`
    /// instead of an error.
    pub fn try_save_writer(&self, writer: impl Write) -> bool {
        match self.save_writer(writer) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "failed to write property stream");
                false
            }
        }
    }

    /// [`save_path`](Self::save_path), reporting failure as `false`
    /// instead of an error. A mid-write failure leaves the file partially
    /// written; no atomicity is provided.
    pub fn try_save_path(&self, path: impl AsRef<Path>) -> bool {
        self.try_save_path_with(path, encoding_rs::UTF_8)
    }

    /// [`save_path_with`](Self::save_path_with), reporting failure as
    /// `false` instead of an error.
    pub fn try_save_path_with(&self, path: impl AsRef<Path>, encoding: &'static Encoding) -> bool {
        match self.save_path_with(path.as_ref(), encoding) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, path = %path.as_ref().display(), "failed to save property file");
                false
            }
        }
    }

    fn load_lines(&mut self, input: &str, options: LoadOptions, strict: bool) -> Result<bool, Error> {
        if options.clear {
            self.properties.clear();
        }
        let mut clean = true;
        for line in input.lines() {
            match parse_line(line) {
                Line::Blank | Line::Comment => {}
                Line::Entry { name, value } => {
                    if options.empty_is_null && value.is_empty() {
                        self.set_null(name);
                    } else {
                        self.set(name, value);
                    }
                }
                Line::Group { .. } => {
                    if strict {
                        return Err(Error::invalid_property(line));
                    }
                    tracing::warn!(line, "skipping group header in flat property file");
                    clean = false;
                }
                Line::Malformed {
                    raw,
                    kind: MalformedKind::UnterminatedGroup,
                } => {
                    if strict {
                        return Err(Error::invalid_group(raw));
                    }
                    // Group syntax errors have no best-effort recovery
                    tracing::warn!(line = raw, "unterminated group header, stopping load");
                    return Ok(false);
                }
                Line::Malformed { raw, .. } => {
                    if strict {
                        return Err(Error::invalid_property(raw));
                    }
                    tracing::warn!(line = raw, "skipping malformed line");
                    clean = false;
                }
            }
        }
        Ok(clean)
    }
}

/// Iterator over a [`PropertyFile`]'s `(name, value)` pairs.
#[derive(Debug, Clone)]
pub struct Iter<'f> {
    inner: indexmap::map::Iter<'f, String, Option<String>>,
}

impl<'f> Iterator for Iter<'f> {
    type Item = (&'f str, Option<&'f str>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'f> IntoIterator for &'f PropertyFile {
    type IntoIter = Iter<'f>;
    type Item = (&'f str, Option<&'f str>);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for PropertyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self {
            write_property(f, name, value)?;
        }
        Ok(())
    }
}

impl FromStr for PropertyFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut file = Self::new();
        file.load_str(s, LoadOptions::default())?;
        Ok(file)
    }
}

/// Indexing sugar over [`PropertyFile::get`].
///
/// # Panics
///
/// Panics if the property is missing or its value is logically absent.
impl ops::Index<&str> for PropertyFile {
    type Output = str;

    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no value for property {name:?}"),
        }
    }
}

impl Extend<(String, Option<String>)> for PropertyFile {
    fn extend<I: IntoIterator<Item = (String, Option<String>)>>(&mut self, iter: I) {
        self.properties.extend(iter);
    }
}

impl FromIterator<(String, Option<String>)> for PropertyFile {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, String)> for PropertyFile {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        iter.into_iter().map(|(name, value)| (name, Some(value))).collect()
    }
}

/// Read a stream to its end and decode it.
fn read_text(mut reader: impl Read, encoding: Option<&'static Encoding>) -> Result<String, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(encoding::decode(&bytes, encoding))
}
