//! Error types for resource loading and decoding

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::registry::ManifestError;

/// The two resource categories that live in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Tileset,
    Blockset,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Tileset => write!(f, "tileset"),
            ResourceKind::Blockset => write!(f, "blockset"),
        }
    }
}

/// Why a binary or image payload could not be turned into a resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The byte stream ended before the record was complete
    #[error("unexpected end of data at byte {offset}")]
    Truncated { offset: u64 },
    /// A blockset declared zero blocks
    #[error("blockset has no blocks")]
    EmptyBlockset,
    /// A tile reference points past the end of its tileset
    #[error("tile {index} is out of bounds for tileset {tileset} ({len} tiles)")]
    TileOutOfBounds { tileset: u32, index: i32, len: usize },
    /// Sprite sheet dimensions are not whole tiles
    #[error("sprite sheet is {width}x{height}, expected a non-empty multiple of {tile}x{tile}")]
    SheetSize { width: u32, height: u32, tile: u32 },
    /// The image container could not be decoded
    #[error("image decode failed: {0}")]
    Image(String),
}

/// Error raised while loading or decoding a resource.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Name is not present in the identifier registry
    #[error("{kind} '{name}' is not registered")]
    UnknownName { kind: ResourceKind, name: String },
    /// Id is outside the identifier registry's range
    #[error("{kind} id {id} is out of range (0..{len})")]
    UnknownId { kind: ResourceKind, id: i64, len: usize },
    /// The backing asset exists but its content is invalid
    #[error("malformed {kind} '{name}': {reason}")]
    Malformed { kind: ResourceKind, name: String, reason: DecodeError },
    /// The backing asset could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An identifier manifest is invalid
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MalformedAsset,
    Io,
    Manifest,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownName { .. } | Error::UnknownId { .. } => ErrorKind::NotFound,
            Error::Malformed { .. } => ErrorKind::MalformedAsset,
            Error::Io { .. } => ErrorKind::Io,
            Error::Manifest(_) => ErrorKind::Manifest,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedAsset
    }

    pub(crate) fn malformed(kind: ResourceKind, name: &str, reason: DecodeError) -> Self {
        Error::Malformed { kind, name: name.to_string(), reason }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
