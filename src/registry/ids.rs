//! Name/id manifests for tilesets and blocksets.

use std::collections::HashMap;

use thiserror::Error;

use crate::error::Result;
use crate::source::AssetSource;

use super::traits::Registry;

/// Error raised when an id manifest cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// The manifest is not valid UTF-8
    #[error("manifest '{path}' is not valid UTF-8")]
    Encoding { path: String },
    /// A line in the middle of the manifest is blank
    #[error("manifest line {line} is empty")]
    EmptyName { line: usize },
    /// The same name appears on two lines
    #[error("manifest name '{name}' on line {line} duplicates line {first}")]
    Duplicate { name: String, line: usize, first: usize },
}

/// Ordered list of asset names where line N of the manifest is id N.
///
/// Immutable once parsed. Lookups in both directions are O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList {
    names: Vec<String>,
    index: HashMap<String, u32>,
}

impl IdList {
    /// Parse a line-delimited manifest.
    ///
    /// Both `\n` and `\r\n` line endings are accepted and a single trailing
    /// newline does not produce an entry.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let mut names = Vec::new();
        let mut index = HashMap::new();
        if body.is_empty() {
            return Ok(Self { names, index });
        }

        for (line, raw) in body.split('\n').enumerate() {
            let name = raw.trim();
            if name.is_empty() {
                return Err(ManifestError::EmptyName { line: line + 1 });
            }
            if let Some(&first) = index.get(name) {
                return Err(ManifestError::Duplicate {
                    name: name.to_string(),
                    line: line + 1,
                    first: first as usize + 1,
                });
            }
            index.insert(name.to_string(), line as u32);
            names.push(name.to_string());
        }

        Ok(Self { names, index })
    }

    /// Read and parse the manifest at `path` from an asset source.
    pub fn load(source: &dyn AssetSource, path: &str) -> Result<Self> {
        let bytes = source.read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ManifestError::Encoding { path: path.to_string() })?;
        let ids = Self::parse(&text)?;
        tracing::debug!("loaded {} ids from '{}'", ids.len(), path);
        Ok(ids)
    }

    /// Id for `name`, or `None` if it is not listed.
    pub fn id(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    /// Name for `id`, or `None` if it is out of range.
    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i as u32, n.as_str()))
    }
}

impl Registry<u32> for IdList {
    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&u32> {
        self.index.get(name)
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.names.iter().map(String::as_str))
    }
}
