//! Named characters
//!
//! The fixed table used by `write` for control and whitespace characters,
//! and by the reader for `#\name` literals.

const NAMED: [(char, &str); 11] = [
    ('\u{0}', "nul"),
    ('\u{7}', "alarm"),
    ('\u{8}', "backspace"),
    ('\t', "tab"),
    ('\n', "newline"),
    ('\u{b}', "vtab"),
    ('\u{c}', "page"),
    ('\r', "return"),
    ('\u{1b}', "esc"),
    (' ', "space"),
    ('\u{7f}', "delete"),
];

/// Name of `c` in the table, if it has one.
pub fn char_name(c: char) -> Option<&'static str> {
    NAMED
        .iter()
        .find(|(named, _)| *named == c)
        .map(|(_, name)| *name)
}

/// Character for a `#\name` literal.
pub fn char_from_name(name: &str) -> Option<char> {
    NAMED.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
}
