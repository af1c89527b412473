//! Binary blockset records.
//!
//! ### format
//! All integers are little-endian.
//! - block count: `u16` (must be at least 1)
//! - iterate block count
//!     - behavior: `u8`
//!     - iterate `BLOCK_NUM_TILES_Y * BLOCK_NUM_TILES_X` cells, row-major
//!         - for elevation `0..=255`
//!             - stack count: `u8`
//!             - iterate stack count
//!                 - x flip: `bool` (1 byte, non-zero is true)
//!                 - y flip: `bool` (1 byte)
//!                 - tileset id: `i32`
//!                 - tile index: `i32`

use std::io::{self, Cursor, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{DecodeError, Error, ResourceKind, Result};

use super::elevation::{ElevationTable, TileGrid, ELEVATION_COUNT};
use super::{BLOCK_NUM_TILES_X, BLOCK_NUM_TILES_Y};

/// A tile reference as stored on disk, before its tileset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRefData {
    pub x_flip: bool,
    pub y_flip: bool,
    pub tileset: i32,
    pub tile: i32,
}

/// A block as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockData {
    pub behavior: u8,
    pub tiles: TileGrid<TileRefData>,
}

/// A block whose references have been passed through a resolver.
pub(crate) struct BlockRecord<T> {
    pub behavior: u8,
    pub tiles: TileGrid<T>,
}

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(bytes) }
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        let offset = self.cursor.position();
        self.cursor.read_u8().map_err(|_| DecodeError::Truncated { offset })
    }

    fn bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.u8()? != 0)
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        let offset = self.cursor.position();
        self.cursor.read_u16::<LittleEndian>().map_err(|_| DecodeError::Truncated { offset })
    }

    fn i32(&mut self) -> Result<i32, DecodeError> {
        let offset = self.cursor.position();
        self.cursor.read_i32::<LittleEndian>().map_err(|_| DecodeError::Truncated { offset })
    }

    fn tile_ref(&mut self) -> Result<TileRefData, DecodeError> {
        Ok(TileRefData {
            x_flip: self.bool()?,
            y_flip: self.bool()?,
            tileset: self.i32()?,
            tile: self.i32()?,
        })
    }

    fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.cursor.position() as usize)
    }
}

/// Read every block of a blockset payload.
///
/// `resolve` runs on each tile reference as soon as it is read, so a failing
/// reference aborts the decode before the rest of the stream is examined.
pub(crate) fn read_blocks<T>(
    name: &str,
    bytes: &[u8],
    mut resolve: impl FnMut(TileRefData) -> Result<T>,
) -> Result<Vec<BlockRecord<T>>> {
    let malformed = |reason| Error::malformed(ResourceKind::Blockset, name, reason);
    let mut r = Reader::new(bytes);

    let count = r.u16().map_err(malformed)?;
    if count == 0 {
        return Err(malformed(DecodeError::EmptyBlockset));
    }

    let mut blocks = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let behavior = r.u8().map_err(malformed)?;
        let mut cells = Vec::with_capacity(BLOCK_NUM_TILES_X * BLOCK_NUM_TILES_Y);
        for _ in 0..BLOCK_NUM_TILES_X * BLOCK_NUM_TILES_Y {
            let mut table = ElevationTable::new();
            for elevation in 0..=u8::MAX {
                let depth = r.u8().map_err(malformed)?;
                let mut stack = Vec::with_capacity(depth as usize);
                for _ in 0..depth {
                    let data = r.tile_ref().map_err(malformed)?;
                    stack.push(resolve(data)?);
                }
                table.set_layer(elevation, stack);
            }
            cells.push(table);
        }
        blocks.push(BlockRecord { behavior, tiles: TileGrid::from_cells(cells) });
    }

    let trailing = r.remaining();
    if trailing > 0 {
        tracing::warn!("blockset '{}' has {} trailing bytes after {} blocks", name, trailing, count);
    }
    tracing::debug!("read {} blocks from blockset '{}'", count, name);

    Ok(blocks)
}

/// Read a blockset payload without loading any tilesets.
pub fn read_block_data(name: &str, bytes: &[u8]) -> Result<Vec<BlockData>> {
    Ok(read_blocks(name, bytes, Ok)?
        .into_iter()
        .map(|b| BlockData { behavior: b.behavior, tiles: b.tiles })
        .collect())
}

/// Write blocks in the dense on-disk layout.
///
/// Fails with [`io::ErrorKind::InvalidInput`] for zero or more than
/// `u16::MAX` blocks, or a stack deeper than 255 references.
pub fn write_blockset<W: Write>(w: &mut W, blocks: &[BlockData]) -> io::Result<()> {
    let count = u16::try_from(blocks.len())
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "block count must be 1..=65535"))?;
    w.write_u16::<LittleEndian>(count)?;

    for block in blocks {
        w.write_u8(block.behavior)?;
        for (_, _, table) in block.tiles.iter() {
            debug_assert_eq!(table.iter().count(), ELEVATION_COUNT);
            for (_, stack) in table.iter() {
                let depth = u8::try_from(stack.len()).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "tile stack deeper than 255")
                })?;
                w.write_u8(depth)?;
                for tile_ref in stack {
                    w.write_u8(tile_ref.x_flip as u8)?;
                    w.write_u8(tile_ref.y_flip as u8)?;
                    w.write_i32::<LittleEndian>(tile_ref.tileset)?;
                    w.write_i32::<LittleEndian>(tile_ref.tile)?;
                }
            }
        }
    }
    Ok(())
}
