//! The asset library: id registries, caches and the source they load from.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blockset::Blockset;
use crate::cache::ResourceCache;
use crate::error::{Error, ResourceKind, Result};
use crate::registry::IdList;
use crate::source::{AssetSource, DirSource};
use crate::tileset::Tileset;

/// Where tilesets and blocksets live inside an asset source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLayout {
    pub tileset_dir: String,
    pub tileset_manifest: String,
    pub tileset_extension: String,
    pub blockset_dir: String,
    pub blockset_manifest: String,
    pub blockset_extension: String,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            tileset_dir: "Tileset".to_string(),
            tileset_manifest: "TilesetIds.txt".to_string(),
            tileset_extension: "png".to_string(),
            blockset_dir: "Blockset".to_string(),
            blockset_manifest: "BlocksetIds.txt".to_string(),
            blockset_extension: "pgeblockset".to_string(),
        }
    }
}

fn join(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), file)
    }
}

impl AssetLayout {
    pub fn tileset_manifest_path(&self) -> String {
        join(&self.tileset_dir, &self.tileset_manifest)
    }

    pub fn blockset_manifest_path(&self) -> String {
        join(&self.blockset_dir, &self.blockset_manifest)
    }

    pub fn tileset_path(&self, name: &str) -> String {
        join(&self.tileset_dir, &format!("{}.{}", name, self.tileset_extension))
    }

    pub fn blockset_path(&self, name: &str) -> String {
        join(&self.blockset_dir, &format!("{}.{}", name, self.blockset_extension))
    }
}

/// Loads tilesets and blocksets by name or id and shares live instances.
///
/// Both manifests are read once when the library is created; a bad manifest
/// fails creation. Resources themselves load on first request.
pub struct Assets {
    source: Box<dyn AssetSource>,
    layout: AssetLayout,
    tileset_ids: IdList,
    blockset_ids: IdList,
    tilesets: ResourceCache<Tileset>,
    blocksets: ResourceCache<Blockset>,
}

impl Assets {
    /// Open the asset tree rooted at `root`.
    pub fn open(root: impl AsRef<Path>, layout: AssetLayout) -> Result<Self> {
        Self::with_source(DirSource::new(root.as_ref()), layout)
    }

    /// Use any asset source, such as embedded in-memory assets.
    pub fn with_source(source: impl AssetSource + 'static, layout: AssetLayout) -> Result<Self> {
        let tileset_ids = IdList::load(&source, &layout.tileset_manifest_path())?;
        let blockset_ids = IdList::load(&source, &layout.blockset_manifest_path())?;
        tracing::info!("opened assets: {} tilesets, {} blocksets", tileset_ids.len(), blockset_ids.len());

        Ok(Self {
            source: Box::new(source),
            layout,
            tileset_ids,
            blockset_ids,
            tilesets: ResourceCache::new(ResourceKind::Tileset),
            blocksets: ResourceCache::new(ResourceKind::Blockset),
        })
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    pub fn tileset_ids(&self) -> &IdList {
        &self.tileset_ids
    }

    pub fn blockset_ids(&self) -> &IdList {
        &self.blockset_ids
    }

    pub fn tileset_cache(&self) -> &ResourceCache<Tileset> {
        &self.tilesets
    }

    pub fn blockset_cache(&self) -> &ResourceCache<Blockset> {
        &self.blocksets
    }

    /// Load or share the tileset with `id`.
    pub fn tileset(&self, id: u32) -> Result<Arc<Tileset>> {
        let name = self.tileset_ids.name(id).ok_or(Error::UnknownId {
            kind: ResourceKind::Tileset,
            id: id as i64,
            len: self.tileset_ids.len(),
        })?;
        self.tilesets.load_or_get(id, || {
            let bytes = self.source.read(&self.layout.tileset_path(name))?;
            Tileset::decode(id, name, &bytes)
        })
    }

    /// Load or share the tileset called `name`.
    pub fn tileset_by_name(&self, name: &str) -> Result<Arc<Tileset>> {
        let id = self.tileset_ids.id(name).ok_or_else(|| Error::UnknownName {
            kind: ResourceKind::Tileset,
            name: name.to_string(),
        })?;
        self.tileset(id)
    }

    /// Load or share the blockset with `id`.
    ///
    /// Every tileset the blockset references is loaded as part of the call.
    pub fn blockset(&self, id: u32) -> Result<Arc<Blockset>> {
        let name = self.blockset_ids.name(id).ok_or(Error::UnknownId {
            kind: ResourceKind::Blockset,
            id: id as i64,
            len: self.blockset_ids.len(),
        })?;
        self.blocksets.load_or_get(id, || {
            let bytes = self.source.read(&self.layout.blockset_path(name))?;
            Blockset::decode(id, name, &bytes, |raw| self.tileset_ref(raw))
        })
    }

    /// Load or share the blockset called `name`.
    pub fn blockset_by_name(&self, name: &str) -> Result<Arc<Blockset>> {
        let id = self.blockset_ids.id(name).ok_or_else(|| Error::UnknownName {
            kind: ResourceKind::Blockset,
            name: name.to_string(),
        })?;
        self.blockset(id)
    }

    /// Resolve a tileset id as stored in a blockset record.
    fn tileset_ref(&self, raw: i32) -> Result<Arc<Tileset>> {
        let id = u32::try_from(raw).map_err(|_| Error::UnknownId {
            kind: ResourceKind::Tileset,
            id: raw as i64,
            len: self.tileset_ids.len(),
        })?;
        self.tileset(id)
    }
}
