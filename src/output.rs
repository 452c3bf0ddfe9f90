//! Parsing of client text output
//!
//! Run non-interactively, the `mysql` client prints one header line and
//! then one line per row, with no borders or padding. For the single-column
//! queries the fixture helper issues (`show databases`, `show tables`,
//! `select <column>`), every value therefore sits alone on its own line,
//! and existence checks reduce to exact line matches.
//!
//! This is tied to that output format. A client that pads, quotes or
//! draws borders around values makes every check a false negative.

/// Rows of client output, split on `'\n'` and otherwise untouched
pub fn rows(output: &str) -> impl Iterator<Item = &str> {
    output.split('\n')
}

/// True iff some row of `output` is exactly `value`
///
/// There is no trimming and no substring matching. A trailing `'\r'` on a
/// row is kept, and whitespace around `value` is the caller's problem.
pub fn has_row_value(output: &str, value: &str) -> bool {
    rows(output).any(|row| row == value)
}
