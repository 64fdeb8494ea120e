//! Rendering properties back to the line grammar.

use std::fmt;

/// Write one property line, picking the operator from the value.
///
/// Values that are empty or begin with whitespace must use `~` so the
/// whitespace survives the next load; everything else uses `=` with a
/// single space of padding on both sides. An absent value is written as
/// `name ~`, which reloads as the empty string.
pub(crate) fn write_property(
    out: &mut impl fmt::Write,
    name: &str,
    value: Option<&str>,
) -> fmt::Result {
    match value {
        Some(value) if value.starts_with(char::is_whitespace) || value.is_empty() => {
            writeln!(out, "{name} ~{value}")
        }
        Some(value) => writeln!(out, "{name} = {value}"),
        None => writeln!(out, "{name} ~"),
    }
}
