//! Blocksets: catalogs of blocks built from tiles of one or more tilesets.
//!
//! A block is a small grid of cells; each cell maps every elevation to a
//! stack of tile references. References point into tilesets that are loaded
//! through the same cache as everything else, so a blockset keeps the tilesets
//! it uses alive for as long as it lives itself.

mod codec;
mod elevation;

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

use crate::compositor::{checkerboard, cross, draw_block, draw_block_all, UNUSED_CELL};
use crate::error::{DecodeError, Error, ResourceKind, Result};
use crate::tileset::{Tile, Tileset, ATLAS_CHECKER_SIZE, TILE_SIZE};

pub use codec::{read_block_data, write_blockset, BlockData, TileRefData};
pub use elevation::{ElevationTable, TileGrid, ELEVATION_COUNT};

/// Tile columns per block
pub const BLOCK_NUM_TILES_X: usize = 2;
/// Tile rows per block
pub const BLOCK_NUM_TILES_Y: usize = 2;
/// Block width in pixels
pub const BLOCK_WIDTH: u32 = BLOCK_NUM_TILES_X as u32 * TILE_SIZE;
/// Block height in pixels
pub const BLOCK_HEIGHT: u32 = BLOCK_NUM_TILES_Y as u32 * TILE_SIZE;
/// Number of block columns in a blockset atlas
pub const ATLAS_BLOCKS_X: u32 = 8;

/// A reference from a block cell to a tile in some tileset.
#[derive(Clone)]
pub struct TileRef {
    pub x_flip: bool,
    pub y_flip: bool,
    tileset: Arc<Tileset>,
    index: usize,
}

impl TileRef {
    /// Create a reference, or `None` if `index` is past the end of `tileset`.
    pub fn new(tileset: Arc<Tileset>, index: usize, x_flip: bool, y_flip: bool) -> Option<Self> {
        (index < tileset.len()).then_some(Self { x_flip, y_flip, tileset, index })
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tile(&self) -> &Tile {
        &self.tileset.tiles()[self.index]
    }

    /// The on-disk form of this reference.
    pub fn to_data(&self) -> TileRefData {
        TileRefData {
            x_flip: self.x_flip,
            y_flip: self.y_flip,
            tileset: self.tileset.id() as i32,
            tile: self.index as i32,
        }
    }
}

impl PartialEq for TileRef {
    fn eq(&self, other: &Self) -> bool {
        self.x_flip == other.x_flip
            && self.y_flip == other.y_flip
            && self.index == other.index
            && self.tileset.id() == other.tileset.id()
    }
}

impl Eq for TileRef {}

impl fmt::Debug for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TileRef({}:{}{}{})",
            self.tileset.id(),
            self.index,
            if self.x_flip { " x" } else { "" },
            if self.y_flip { " y" } else { "" }
        )
    }
}

/// One block of a [`Blockset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    blockset: u32,
    index: usize,
    behavior: u8,
    tiles: TileGrid<TileRef>,
}

impl Block {
    /// Id of the blockset this block belongs to.
    pub fn blockset(&self) -> u32 {
        self.blockset
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn behavior(&self) -> u8 {
        self.behavior
    }

    pub fn tiles(&self) -> &TileGrid<TileRef> {
        &self.tiles
    }

    pub fn to_data(&self) -> BlockData {
        BlockData { behavior: self.behavior, tiles: self.tiles.map(TileRef::to_data) }
    }

    /// Render the block on a transparent canvas.
    ///
    /// With `Some(elevation)` only that elevation is drawn, otherwise every
    /// elevation is drawn from 0 up.
    pub fn render(&self, elevation: Option<u8>) -> RgbaImage {
        let mut canvas = RgbaImage::new(BLOCK_WIDTH, BLOCK_HEIGHT);
        match elevation {
            Some(e) => draw_block(&mut canvas, 0, 0, self, e),
            None => draw_block_all(&mut canvas, 0, 0, self),
        }
        canvas
    }
}

/// A decoded blockset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blockset {
    id: u32,
    name: String,
    blocks: Vec<Block>,
}

impl Blockset {
    /// Decode a blockset payload.
    ///
    /// `tileset` is called with every raw tileset id as soon as the reference
    /// is read; its errors abort the decode unchanged. A tile index past the
    /// end of its tileset makes the blockset malformed.
    pub fn decode(
        id: u32,
        name: &str,
        bytes: &[u8],
        mut tileset: impl FnMut(i32) -> Result<Arc<Tileset>>,
    ) -> Result<Self> {
        let records = codec::read_blocks(name, bytes, |data| {
            let set = tileset(data.tileset)?;
            usize::try_from(data.tile)
                .ok()
                .and_then(|index| TileRef::new(set.clone(), index, data.x_flip, data.y_flip))
                .ok_or_else(|| {
                    Error::malformed(
                        ResourceKind::Blockset,
                        name,
                        DecodeError::TileOutOfBounds { tileset: set.id(), index: data.tile, len: set.len() },
                    )
                })
        })?;

        let blocks = records
            .into_iter()
            .enumerate()
            .map(|(index, r)| Block { blockset: id, index, behavior: r.behavior, tiles: r.tiles })
            .collect::<Vec<_>>();
        tracing::info!("built blockset {} '{}' with {} blocks", id, name, blocks.len());

        Ok(Self { id, name: name.to_string(), blocks })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a decoded blockset.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Ids of every tileset referenced by any block, sorted and deduplicated.
    pub fn tileset_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .blocks
            .iter()
            .flat_map(|b| b.tiles.iter())
            .flat_map(|(_, _, table)| table.occupied())
            .flat_map(|(_, stack)| stack.iter().map(|r| r.tileset.id()))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Preview bitmap of every block, all elevations, eight blocks per row.
    ///
    /// Uses the same checkerboard and unused-cell marker as tileset atlases.
    pub fn render_atlas(&self) -> RgbaImage {
        let rows = (self.blocks.len() as u32).div_ceil(ATLAS_BLOCKS_X);
        let mut atlas = RgbaImage::new(ATLAS_BLOCKS_X * BLOCK_WIDTH, rows * BLOCK_HEIGHT);
        checkerboard(&mut atlas, ATLAS_CHECKER_SIZE, ATLAS_CHECKER_SIZE);

        for (i, block) in self.blocks.iter().enumerate() {
            let x = (i as u32 % ATLAS_BLOCKS_X) * BLOCK_WIDTH;
            let y = (i as u32 / ATLAS_BLOCKS_X) * BLOCK_HEIGHT;
            draw_block_all(&mut atlas, x as i32, y as i32, block);
        }

        let used = self.blocks.len() as u32 % ATLAS_BLOCKS_X;
        if used != 0 {
            let y = (rows - 1) * BLOCK_HEIGHT;
            for col in used..ATLAS_BLOCKS_X {
                cross(&mut atlas, (col * BLOCK_WIDTH) as i32, y as i32, BLOCK_WIDTH, BLOCK_HEIGHT, UNUSED_CELL);
            }
        }

        atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    /// Tileset 0: tile 0 solid red, tile 1 green with a clear right half,
    /// tile 2 with a single green pixel at the top-left.
    fn tileset() -> Arc<Tileset> {
        let sheet = RgbaImage::from_fn(24, 8, |x, y| match x / 8 {
            0 => RED,
            1 if x % 8 < 4 => GREEN,
            2 if x == 16 && y == 0 => GREEN,
            _ => CLEAR,
        });
        Arc::new(Tileset::from_sheet(0, "tiles", &sheet).unwrap())
    }

    fn data(tileset: i32, tile: i32, x_flip: bool) -> TileRefData {
        TileRefData { x_flip, y_flip: false, tileset, tile }
    }

    fn encode(blocks: &[BlockData]) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_blockset(&mut bytes, blocks).unwrap();
        bytes
    }

    fn decode(bytes: &[u8]) -> Result<Blockset> {
        let set = tileset();
        Blockset::decode(4, "test", bytes, |id| {
            if id == 0 {
                Ok(set.clone())
            } else {
                Err(Error::UnknownId { kind: ResourceKind::Tileset, id: id as i64, len: 1 })
            }
        })
    }

    fn stacked_block() -> BlockData {
        let mut block = BlockData { behavior: 2, ..Default::default() };
        block.tiles.get_mut(0, 0).set_layer(0, vec![data(0, 0, false), data(0, 1, false)]);
        block.tiles.get_mut(1, 0).set_layer(1, vec![data(0, 1, true)]);
        block.tiles.get_mut(0, 1).set_layer(0, vec![data(0, 2, false)]);
        block
    }

    #[test]
    fn test_decode_resolves_references() {
        let blockset = decode(&encode(&[stacked_block()])).unwrap();
        assert_eq!(blockset.id(), 4);
        assert_eq!(blockset.len(), 1);

        let block = blockset.block(0).unwrap();
        assert_eq!(block.behavior(), 2);
        assert_eq!(block.blockset(), 4);
        let stack = block.tiles().get(0, 0).layer(0);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[1].tile().index(), 1);
        assert_eq!(stack[1].tileset().name(), "tiles");
        assert!(block.tiles().get(1, 0).layer(1)[0].x_flip);
        assert_eq!(blockset.tileset_ids(), vec![0]);
    }

    #[test]
    fn test_to_data_round_trip() {
        let original = stacked_block();
        let blockset = decode(&encode(&[original.clone()])).unwrap();
        assert_eq!(blockset.blocks()[0].to_data(), original);
    }

    #[test]
    fn test_decode_twice_is_identical() {
        let bytes = encode(&[stacked_block(), BlockData::default()]);
        assert_eq!(decode(&bytes).unwrap(), decode(&bytes).unwrap());
    }

    #[test]
    fn test_tile_index_out_of_bounds() {
        let mut block = BlockData::default();
        block.tiles.get_mut(1, 1).set_layer(9, vec![data(0, 3, false)]);
        let err = decode(&encode(&[block])).unwrap_err();
        assert!(matches!(
            err,
            Error::Malformed { reason: DecodeError::TileOutOfBounds { tileset: 0, index: 3, len: 3 }, .. }
        ));
    }

    #[test]
    fn test_negative_tile_index() {
        let mut block = BlockData::default();
        block.tiles.get_mut(0, 0).set_layer(0, vec![data(0, -1, false)]);
        assert!(decode(&encode(&[block])).unwrap_err().is_malformed());
    }

    #[test]
    fn test_unknown_tileset_is_not_found() {
        let mut block = BlockData::default();
        block.tiles.get_mut(0, 0).set_layer(0, vec![data(5, 0, false)]);
        assert!(decode(&encode(&[block])).unwrap_err().is_not_found());
    }

    #[test]
    fn test_render_stacks_bottom_to_top() {
        let blockset = decode(&encode(&[stacked_block()])).unwrap();
        let block = blockset.block(0).unwrap();

        let image = block.render(Some(0));
        // green left half of tile 1 covers red, the clear right half shows red
        assert_eq!(*image.get_pixel(0, 0), GREEN);
        assert_eq!(*image.get_pixel(3, 7), GREEN);
        assert_eq!(*image.get_pixel(4, 0), RED);
        assert_eq!(*image.get_pixel(7, 7), RED);
        // elevation 1 is not drawn
        assert_eq!(*image.get_pixel(8, 0), CLEAR);
        // tile 2 in the bottom-left cell
        assert_eq!(*image.get_pixel(0, 8), GREEN);
        assert_eq!(*image.get_pixel(1, 8), CLEAR);
    }

    #[test]
    fn test_render_flipped_cell() {
        let blockset = decode(&encode(&[stacked_block()])).unwrap();
        let image = blockset.block(0).unwrap().render(Some(1));
        // mirrored tile 1: clear on the left, green on the right
        assert_eq!(*image.get_pixel(8, 0), CLEAR);
        assert_eq!(*image.get_pixel(12, 0), GREEN);
        assert_eq!(*image.get_pixel(15, 7), GREEN);
        assert_eq!(*image.get_pixel(0, 0), CLEAR);
    }

    #[test]
    fn test_render_all_elevations() {
        let blockset = decode(&encode(&[stacked_block()])).unwrap();
        let image = blockset.block(0).unwrap().render(None);
        assert_eq!(*image.get_pixel(0, 0), GREEN);
        assert_eq!(*image.get_pixel(12, 0), GREEN);
    }

    #[test]
    fn test_atlas_layout() {
        let blocks = vec![stacked_block(); 3];
        let blockset = decode(&encode(&blocks)).unwrap();
        let atlas = blockset.render_atlas();
        assert_eq!(atlas.dimensions(), (128, 16));
        assert_eq!(*atlas.get_pixel(16, 0), GREEN);
        assert_eq!(*atlas.get_pixel(36, 0), RED);
        for col in 3..8 {
            assert_eq!(*atlas.get_pixel(col * BLOCK_WIDTH, 0), UNUSED_CELL);
            assert_eq!(*atlas.get_pixel(col * BLOCK_WIDTH + 15, 0), UNUSED_CELL);
        }
    }
}
