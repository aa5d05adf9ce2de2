//! Fixed tables of code fragments.
//!
//! Two catalogs exist: [`FIELD_CATALOG`] holds the per-field snippets that are
//! expanded from raw substitution data, while [`BLOCK_CATALOG`] holds the
//! wrappers that nest already rendered text (record impls, slice impls and
//! the file module).

mod field;
pub use field::*;

mod block;
pub use block::*;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A named, immutable mapping from a template key to fragment text.
#[derive(Debug)]
pub struct Catalog<K: 'static> {
    name: &'static str,
    entries: &'static [(K, &'static str)],
}

impl<K: 'static> Catalog<K> {
    pub const fn new(name: &'static str, entries: &'static [(K, &'static str)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> Catalog<K>
where
    K: Copy + PartialEq + std::fmt::Display + 'static,
{
    /// Returns the fragment registered for `key`.
    ///
    /// There is no fallback fragment - an unregistered key is an error.
    pub fn get(&self, key: K) -> Result<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| Error::TemplateNotFound {
                catalog: self.name,
                key: key.to_string(),
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }
}

/// Direction selects the encode or decode half of a field's fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Encode,
    Decode,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Encode, Direction::Decode];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
