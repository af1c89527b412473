//! tilecomp - Tileset and blockset loading, caching and compositing
//!
//! This library provides functionality to:
//! - Map resource names to integer ids from plain-text manifests
//! - Slice tileset sheets into 8x8 tiles and render tileset atlases
//! - Decode binary blockset files into blocks of layered tile references
//! - Share live tilesets and blocksets through a weak, id-keyed cache
//! - Composite tiles and blocks onto RGBA canvases

pub mod assets;
pub mod blockset;
pub mod cache;
pub mod cli;
pub mod compositor;
pub mod config;
pub mod error;
pub mod output;
pub mod registry;
pub mod source;
pub mod tileset;

pub use assets::{AssetLayout, Assets};
pub use blockset::{Block, Blockset, TileRef};
pub use cache::{CacheStats, ResourceCache};
pub use error::{DecodeError, Error, ErrorKind, ResourceKind, Result};
pub use registry::IdList;
pub use source::{AssetSource, DirSource, MemorySource};
pub use tileset::{Tile, Tileset};
