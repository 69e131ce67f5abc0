//! Naming utilities for SchemaSync
//!
//! Identifier quoting for the MySQL dialect.

/// Quote character MySQL uses around identifiers
pub const IDENTIFIER_QUOTE: char = '`';

/// Quote an identifier with backticks, doubling any embedded backtick
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(IDENTIFIER_QUOTE);
    for c in name.chars() {
        if c == IDENTIFIER_QUOTE {
            quoted.push(IDENTIFIER_QUOTE);
        }
        quoted.push(c);
    }
    quoted.push(IDENTIFIER_QUOTE);
    quoted
}
