//! `@name@` markers and their substitution.

use std::collections::BTreeMap;

use gdadmob_props::{list_literal, split_list, PropertySet};

const MARKER: char = '@';

/// Mapping from bare token name to replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    tokens: BTreeMap<String, String>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    /// Inserts `items` rendered as a quoted list literal.
    pub fn insert_list<S: AsRef<str>>(&mut self, name: impl Into<String>, items: &[S]) -> &mut Self {
        self.tokens.insert(name.into(), list_literal(items));
        self
    }

    /// Builds the generic sweep map over a property set: every property
    /// becomes a token, and values containing a comma are rendered as a
    /// quoted list literal.
    pub fn sweep(props: &PropertySet) -> Self {
        props
            .iter()
            .map(|(key, value)| {
                let rendered = if value.contains(',') {
                    list_literal(&split_list(value))
                } else {
                    value.to_string()
                };
                (key.to_string(), rendered)
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            tokens: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One marker replaced during substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub token: String,
    pub value: String,
}

/// A marker left in generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedToken {
    pub name: String,
    /// 1-based line number.
    pub line: usize,
}

/// Replaces every `@name@` in `line` whose name is in `tokens`.
///
/// Inserted values are not rescanned. When a marker's name is unknown its
/// closing `@` is still eligible to open the next marker, so the result
/// matches replacing each `@name@` substring wherever it occurs.
pub fn substitute_line(line: &str, tokens: &TokenMap) -> (String, Vec<Replacement>) {
    let mut out = String::with_capacity(line.len());
    let mut replacements = Vec::new();
    let mut copied = 0;
    let mut search = 0;

    while let Some((open, close)) = next_marker(line, search) {
        let name = &line[open + 1..close];
        match tokens.get(name) {
            Some(value) if is_token_name(name) => {
                out.push_str(&line[copied..open]);
                out.push_str(value);
                replacements.push(Replacement {
                    token: name.to_string(),
                    value: value.to_string(),
                });
                copied = close + 1;
                search = close + 1;
            }
            _ => search = close,
        }
    }

    out.push_str(&line[copied..]);
    (out, replacements)
}

/// Applies [`substitute_line`] to every line, preserving line endings.
pub fn substitute(text: &str, tokens: &TokenMap) -> (String, Vec<Replacement>) {
    let mut out = String::with_capacity(text.len());
    let mut all = Vec::new();
    for line in text.split_inclusive('\n') {
        let (replaced, mut replacements) = substitute_line(line, tokens);
        out.push_str(&replaced);
        all.append(&mut replacements);
    }
    (out, all)
}

/// Reports every `@identifier@` marker still present in `text`.
pub fn find_unresolved(text: &str) -> Vec<UnresolvedToken> {
    let mut found = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let mut search = 0;
        while let Some((open, close)) = next_marker(line, search) {
            let name = &line[open + 1..close];
            if is_identifier(name) {
                found.push(UnresolvedToken {
                    name: name.to_string(),
                    line: idx + 1,
                });
                search = close + 1;
            } else {
                search = close;
            }
        }
    }
    found
}

/// Byte offsets of the next `@...@` pair starting at or after `from`.
fn next_marker(line: &str, from: usize) -> Option<(usize, usize)> {
    let open = from + line.get(from..)?.find(MARKER)?;
    let close = open + 1 + line[open + 1..].find(MARKER)?;
    Some((open, close))
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
