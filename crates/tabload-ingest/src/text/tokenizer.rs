//! Splitting raw lines into field tokens.

use std::collections::BTreeSet;

/// Delimiter set plus the collapse flag, reused for every line of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    delimiters: Vec<char>,
    collapse: bool,
}

impl Tokenizer {
    pub fn new(delimiters: &BTreeSet<char>, collapse: bool) -> Self {
        Self {
            delimiters: delimiters.iter().copied().collect(),
            collapse,
        }
    }

    /// Splits one line. See [`split`].
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        split_with(line, |c| self.delimiters.contains(&c), self.collapse)
    }
}

/// Splits `line` on any character in `delimiters`.
///
/// Without `collapse`, every delimiter ends a token, so `"a,,b,"` yields
/// `["a", "", "b", ""]`. With `collapse`, empty tokens are dropped, which
/// also swallows leading and trailing delimiters. An empty line yields no
/// tokens in either mode. Whitespace is left untouched.
pub fn split<'a>(line: &'a str, delimiters: &BTreeSet<char>, collapse: bool) -> Vec<&'a str> {
    split_with(line, |c| delimiters.contains(&c), collapse)
}

fn split_with<'a>(
    line: &'a str,
    is_delimiter: impl Fn(char) -> bool,
    collapse: bool,
) -> Vec<&'a str> {
    if line.is_empty() {
        return Vec::new();
    }
    let pieces = line.split(is_delimiter);
    if collapse {
        pieces.filter(|token| !token.is_empty()).collect()
    } else {
        pieces.collect()
    }
}
