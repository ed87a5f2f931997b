//! Class index table for the conditional generator.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Bidirectional map between class indices and human-readable names.
///
/// Parsed from a dict literal such as `{0: 'tench, Tinca tinca', 1: 'goldfish'}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTable {
    names: BTreeMap<usize, String>,
}

impl ClassTable {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::MissingArtifact {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let body = text
            .trim()
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .ok_or_else(|| Error::Serialization("class table must be enclosed in braces".into()))?;

        let mut names = BTreeMap::new();
        let mut rest = body.trim_start();
        while !rest.is_empty() {
            let (key, after_key) = rest
                .split_once(':')
                .ok_or_else(|| Error::Serialization(format!("missing ':' near '{}'", preview(rest))))?;
            let index: usize = key
                .trim()
                .parse()
                .map_err(|_| Error::Serialization(format!("bad class index '{}'", key.trim())))?;

            let after_key = after_key.trim_start();
            let quote = after_key
                .chars()
                .next()
                .filter(|c| *c == '\'' || *c == '"')
                .ok_or_else(|| Error::Serialization(format!("class {index}: expected a quoted name")))?;
            let value = &after_key[1..];
            let close = value
                .find(quote)
                .ok_or_else(|| Error::Serialization(format!("class {index}: unterminated name")))?;
            if names.insert(index, value[..close].to_string()).is_some() {
                return Err(Error::Serialization(format!("duplicate class index {index}")));
            }

            rest = value[close + 1..].trim_start();
            rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(&index).map(String::as_str)
    }

    /// Index of the first class whose name, or any comma-separated alias of it,
    /// matches `query` case-insensitively.
    pub fn index_of(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        self.names.iter().find_map(|(&index, name)| {
            let hit = name.eq_ignore_ascii_case(query)
                || name.split(',').any(|alias| alias.trim().eq_ignore_ascii_case(query));
            hit.then_some(index)
        })
    }

    /// Resolve either a numeric index or a class name.
    pub fn resolve(&self, key: &str) -> Result<usize> {
        if let Ok(index) = key.trim().parse::<usize>() {
            return if self.names.contains_key(&index) || self.is_empty() {
                Ok(index)
            } else {
                Err(Error::InvalidArgument(format!("unknown class index {index}")))
            };
        }
        self.index_of(key)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown class name '{key}'")))
    }
}

fn preview(text: &str) -> &str {
    let end = text.char_indices().nth(20).map_or(text.len(), |(i, _)| i);
    &text[..end]
}
