use std::io;
use thiserror::Error;

/// Everything that can go wrong while loading, saving, or mapping a
/// property file.
#[derive(Debug, Error)]
pub enum Error {
    /// A line matched neither the `=` nor the `~` operator and was not a
    /// comment, blank line, or group header. Carries the offending line
    /// as read from the input.
    #[error("expected either `=` or `~` : {line}")]
    InvalidProperty { line: String },

    /// A group header opened with `[` but never closed with `]`.
    #[error("group header is missing a closing `]` : {line}")]
    InvalidGroup { line: String },

    /// A property value could not be converted to the requested type.
    #[error("cannot convert property `{name}` from {value:?}")]
    Conversion { name: String, value: String },

    /// The underlying stream or file could not be opened, read, or
    /// written. Never retried.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn invalid_property(line: &str) -> Self {
        Self::InvalidProperty { line: line.to_owned() }
    }

    pub(crate) fn invalid_group(line: &str) -> Self {
        Self::InvalidGroup { line: line.to_owned() }
    }

    /// Build a [`Error::Conversion`] for the given property name and the
    /// value that failed to convert.
    ///
    /// Public because the derive macros construct this in generated code.
    #[must_use]
    pub fn conversion(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Conversion {
            name: name.into(),
            value: value.into(),
        }
    }
}
