//! Line grammar for the .property format.
//!
//! The format is line oriented. Each line is one of five things: blank,
//! a `#` comment, a `[group]` header, a property, or garbage. Properties
//! come in two spellings:
//!
//! ```property
//! name = value
//! name ~   value
//! ```
//!
//! `=` is the canonical operator: the value is trimmed, so entries may be
//! indented and aligned freely. `~` preserves the value verbatim from the
//! character after the operator, for values whose leading whitespace is
//! meaningful. `=` is searched for first, so a value containing `=` must
//! not be written with `~`.

/// One classified line. Borrows from the input line.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Line<'l> {
    /// Nothing but whitespace.
    Blank,
    /// First non-space character was `#`.
    Comment,
    /// A `[name]` header. The name is trimmed; an empty name means
    /// "return to the global scope".
    Group { name: &'l str },
    /// A `name = value` or `name ~value` property.
    Entry { name: &'l str, value: &'l str },
    /// Anything else.
    Malformed { raw: &'l str, kind: MalformedKind },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MalformedKind {
    /// Neither `=` nor `~` appears in the line.
    MissingOperator,
    /// The line opens a group header but has no closing `]`.
    UnterminatedGroup,
}

/// Classify a single line of input.
#[must_use]
pub fn parse_line(line: &str) -> Line<'_> {
    let trimmed = line.trim_start();
    // Match on the first character
    match trimmed.chars().next() {
        None => Line::Blank,
        Some('#') => Line::Comment,
        Some('[') => match trimmed.rfind(']') {
            Some(end) => Line::Group {
                name: trimmed[1..end].trim(),
            },
            None => Line::Malformed {
                raw: line,
                kind: MalformedKind::UnterminatedGroup,
            },
        },
        Some(..) => {
            // `=` takes precedence over `~`
            if let Some(idx) = trimmed.find('=') {
                Line::Entry {
                    name: trimmed[..idx].trim_end(),
                    value: trimmed[idx + 1..].trim(),
                }
            } else if let Some(idx) = trimmed.find('~') {
                Line::Entry {
                    name: trimmed[..idx].trim_end(),
                    value: &trimmed[idx + 1..],
                }
            } else {
                Line::Malformed {
                    raw: line,
                    kind: MalformedKind::MissingOperator,
                }
            }
        }
    }
}
