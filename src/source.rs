//! Where resource bytes come from.
//!
//! The editor reads loose files below an asset directory while the game ships
//! the same files as embedded blobs, so both are exposed behind [`AssetSource`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A read-only store of asset files addressed by relative path.
pub trait AssetSource: Send + Sync {
    /// Read the whole asset at `path` (relative, `/`-separated).
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Assets stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = path.split('/').fold(self.root.clone(), |acc, part| acc.join(part));
        fs::read(&full).map_err(|source| Error::Io { path: full, source })
    }
}

/// Assets held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| Error::Io {
            path: PathBuf::from(path),
            source: io::Error::new(io::ErrorKind::NotFound, "no such embedded asset"),
        })
    }
}
