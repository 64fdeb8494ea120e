//! The group-aware property store.

use crate::{
    encoding,
    error::Error,
    file::{read_text, LoadOptions, PropertyFile},
    parse::{parse_line, Line, MalformedKind},
};
use encoding_rs::Encoding;
use indexmap::IndexMap;
use std::{
    fmt, fs,
    io::{Read, Write},
    path::Path,
    str::FromStr,
};

/// A property file with one level of named `[group]` scopes.
///
/// Properties above the first group header (or after an empty `[]`
/// header) live in the global scope. Each group is an independent
/// [`PropertyFile`]; group names are unique and kept in insertion order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct GroupedPropertyFile {
    global: PropertyFile,
    groups: IndexMap<String, PropertyFile>,
}

impl GroupedPropertyFile {
    /// An empty store with an empty global scope and no groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` with default [`LoadOptions`]. Strict.
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

    /// The un-grouped scope.
    #[must_use]
    pub fn global(&self) -> &PropertyFile {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut PropertyFile {
        &mut self.global
    }

    /// A group's store, if the group exists.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&PropertyFile> {
        self.groups.get(name)
    }

    /// A group's store, created empty if the group is new.
    pub fn group_mut(&mut self, name: &str) -> &mut PropertyFile {
        self.groups.entry(name.to_owned()).or_default()
    }

    /// Iterate over `(group name, store)` pairs in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &PropertyFile)> {
        self.groups.iter().map(|(name, file)| (name.as_str(), file))
    }

    #[must_use]
    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Remove a group and everything in it, preserving the order of the
    /// rest. Returns whether the group existed.
    pub fn remove_group(&mut self, name: &str) -> bool {
        self.groups.shift_remove(name).is_some()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Empty the global scope and drop every group.
    pub fn clear(&mut self) {
        self.global.clear();
        self.groups.clear();
    }

    /// Parse `input`, strict mode.
    pub fn load_str(&mut self, input: &str, options: LoadOptions) -> Result<(), Error> {
        self.load_lines(input, options, true).map(|_clean| ())
    }

    /// Parse `input`, best effort. Lines with no operator are skipped;
    /// an unterminated group header still stops the load, since entries
    /// after it have no well-defined scope. Returns `true` only if the
    /// whole input parsed.
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
        tracing::debug!(path = %path.display(), "loading grouped property file");
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

    /// Write the store to `writer` in the given encoding. Global
    /// properties come first, then each group under its header.
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
        tracing::debug!(path = %path.display(), groups = self.group_count(), "saving grouped property file");
        self.save_writer_with(fs::File::create(path)?, encoding)
    }

    /// [`save_writer`](Self::save_writer), reporting failure as `false`.
    pub fn try_save_writer(&self, writer: impl Write) -> bool {
        match self.save_writer(writer) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "failed to write property stream");
                false
            }
        }
    }

    /// [`save_path`](Self::save_path), reporting failure as `false`.
    pub fn try_save_path(&self, path: impl AsRef<Path>) -> bool {
        self.try_save_path_with(path, encoding_rs::UTF_8)
    }

    /// [`save_path_with`](Self::save_path_with), reporting failure as
    /// `false`.
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
            self.clear();
        }
        // Written on the next entry line; None is the global scope
        let mut scope: Option<String> = None;
        let mut clean = true;
        for line in input.lines() {
            match parse_line(line) {
                Line::Blank | Line::Comment => {}
                Line::Group { name } => {
                    if name.is_empty() {
                        scope = None;
                    } else {
                        // The group exists from its header on, even if
                        // it never receives an entry
                        self.groups.entry(name.to_owned()).or_default();
                        scope = Some(name.to_owned());
                    }
                }
                Line::Entry { name, value } => {
                    let store = match &scope {
                        Some(group) => self.groups.entry(group.clone()).or_default(),
                        None => &mut self.global,
                    };
                    if options.empty_is_null && value.is_empty() {
                        store.set_null(name);
                    } else {
                        store.set(name, value);
                    }
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

impl fmt::Display for GroupedPropertyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.global)?;
        for (name, group) in self.groups() {
            writeln!(f, "[{name}]")?;
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

impl FromStr for GroupedPropertyFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut file = Self::new();
        file.load_str(s, LoadOptions::default())?;
        Ok(file)
    }
}
