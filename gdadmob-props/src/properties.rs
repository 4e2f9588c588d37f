//! Flat `key=value` property files.
//!
//! The accepted syntax is the `.properties` dialect the Gradle build reads:
//! `#` and `!` comments, `=` or `:` (or whitespace) between key and value,
//! trailing-backslash continuation lines and backslash escapes including
//! `\uXXXX` (UTF-16 surrogate pairs included). A line holding only a key
//! maps that key to an empty value.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::error::{PropsError, PropsResult};

/// An immutable key/value mapping loaded from one property file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    entries: BTreeMap<String, String>,
}

impl PropertySet {
    /// Loads and parses a property file. A missing file is fatal.
    pub fn load(path: &Path) -> PropsResult<Self> {
        if !path.exists() {
            return Err(PropsError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| PropsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::parse(&text)?;
        debug!(path = %path.display(), entries = set.len(), "Loaded property file");
        Ok(set)
    }

    /// Parses property text. Later duplicates of a key replace earlier ones.
    pub fn parse(text: &str) -> PropsResult<Self> {
        let mut entries = BTreeMap::new();
        for (line_no, logical) in logical_lines(text) {
            let (key, value) = parse_entry(&logical, line_no)?;
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or a [`PropsError::MissingKey`].
    pub fn require(&self, key: &str) -> PropsResult<&str> {
        self.get(key)
            .ok_or_else(|| PropsError::MissingKey(key.to_string()))
    }

    /// Returns the comma-separated items of `key`, trimmed, blanks dropped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key).map(split_list).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries whose key starts with `<prefix>.`, yielded with the prefix
    /// and dot stripped.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter().filter_map(move |(k, v)| {
            k.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|rest| (rest, v))
        })
    }

    /// Distinct dot-prefixes of namespaced keys, sorted.
    ///
    /// `applovin.pod` and `applovin.podVersion` both contribute `applovin`;
    /// keys without a dot contribute nothing.
    pub fn namespaces(&self) -> BTreeSet<&str> {
        self.keys()
            .filter_map(|k| k.split_once('.').map(|(prefix, _)| prefix))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Splits a comma-separated value into trimmed, non-blank items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders items as the quoted array body the plugin scripts expect:
/// `"x", "y", "z"`.
pub fn list_literal<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Joins continuation lines and drops blanks and comments.
/// Yields each logical line with the 1-based number of its first physical line.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_start();
        let (start, mut buf) = match pending.take() {
            Some(p) => p,
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                (idx + 1, String::new())
            }
        };

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            buf.push_str(&line[..line.len() - 1]);
            pending = Some((start, buf));
        } else {
            buf.push_str(line);
            out.push((start, buf));
        }
    }

    if let Some(last) = pending {
        out.push(last);
    }
    out
}

fn parse_entry(line: &str, line_no: usize) -> PropsResult<(String, String)> {
    let malformed = |reason: &str| PropsError::Malformed {
        line: line_no,
        reason: reason.to_string(),
    };

    let mut chars = line.char_indices().peekable();
    let mut key_end = line.len();
    let mut escaped = false;
    while let Some((i, c)) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let raw_key = &line[..key_end];
    if raw_key.is_empty() {
        return Err(malformed("empty key"));
    }

    let rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    let value_part = match rest.chars().next() {
        Some('=') | Some(':') => rest[1..].trim_start_matches([' ', '\t', '\x0c']),
        _ => rest,
    };

    let key = unescape(raw_key).map_err(|reason| malformed(&reason))?;
    let value = unescape(value_part).map_err(|reason| malformed(&reason))?;
    Ok((key, value))
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_utf16_unit(&mut chars)?;
                let ch = if (0xD800..0xDC00).contains(&unit) {
                    // high surrogate, the low half must follow as `\uXXXX`
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_utf16_unit(&mut chars)?,
                        _ => return Err(format!("unpaired surrogate '\\u{unit:04X}'")),
                    };
                    char::decode_utf16([unit, low])
                        .next()
                        .and_then(Result::ok)
                        .ok_or_else(|| format!("unpaired surrogate '\\u{unit:04X}'"))?
                } else {
                    char::from_u32(u32::from(unit))
                        .ok_or_else(|| format!("unpaired surrogate '\\u{unit:04X}'"))?
                };
                out.push(ch);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Reads the four hex digits of a `\u` escape.
fn read_utf16_unit(chars: &mut std::str::Chars<'_>) -> Result<u16, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid unicode escape '\\u{hex}'"));
    }
    u16::from_str_radix(&hex, 16).map_err(|e| format!("invalid unicode escape '\\u{hex}': {e}"))
}
