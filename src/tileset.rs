//! Tilesets: a sprite sheet cut into 8x8 tiles plus a preview atlas.

use std::fmt;

use image::imageops;
use image::RgbaImage;

use crate::compositor::{checkerboard, cross, draw, UNUSED_CELL};
use crate::error::{DecodeError, Error, ResourceKind, Result};

/// Edge length of a tile in pixels
pub const TILE_SIZE: u32 = 8;
/// Number of tile columns in a tileset atlas
pub const ATLAS_TILES_X: u32 = 8;
/// Checkerboard cell size used under atlas cells
pub const ATLAS_CHECKER_SIZE: u32 = 4;

/// One 8x8 tile owned by a [`Tileset`].
#[derive(Clone, PartialEq, Eq)]
pub struct Tile {
    tileset: u32,
    index: usize,
    colors: RgbaImage,
}

impl Tile {
    /// Id of the tileset this tile belongs to.
    pub fn tileset(&self) -> u32 {
        self.tileset
    }

    /// Position of the tile inside its tileset.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The tile's 8x8 pixels.
    pub fn colors(&self) -> &RgbaImage {
        &self.colors
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<image::Rgba<u8>> {
        (x < TILE_SIZE && y < TILE_SIZE).then(|| *self.colors.get_pixel(x, y))
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile").field("tileset", &self.tileset).field("index", &self.index).finish()
    }
}

/// An ordered set of tiles and the atlas bitmap that previews them.
#[derive(Clone, PartialEq, Eq)]
pub struct Tileset {
    id: u32,
    name: String,
    tiles: Vec<Tile>,
    atlas: RgbaImage,
}

impl Tileset {
    /// Build a tileset from an already decoded sprite sheet.
    ///
    /// The sheet is cut into 8x8 cells left to right, top to bottom. The same
    /// sheet always produces an identical tileset.
    pub fn from_sheet(id: u32, name: &str, sheet: &RgbaImage) -> Result<Self, DecodeError> {
        let (width, height) = sheet.dimensions();
        if width == 0 || height == 0 || width % TILE_SIZE != 0 || height % TILE_SIZE != 0 {
            return Err(DecodeError::SheetSize { width, height, tile: TILE_SIZE });
        }

        let cols = width / TILE_SIZE;
        let rows = height / TILE_SIZE;
        let mut tiles = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let colors =
                    imageops::crop_imm(sheet, col * TILE_SIZE, row * TILE_SIZE, TILE_SIZE, TILE_SIZE)
                        .to_image();
                tiles.push(Tile { tileset: id, index: tiles.len(), colors });
            }
        }

        let atlas = render_atlas(&tiles);
        Ok(Self { id, name: name.to_string(), tiles, atlas })
    }

    /// Decode a PNG sprite sheet and build a tileset from it.
    pub fn decode(id: u32, name: &str, bytes: &[u8]) -> Result<Self> {
        let malformed = |reason| Error::malformed(ResourceKind::Tileset, name, reason);
        let sheet = image::load_from_memory(bytes)
            .map_err(|e| malformed(DecodeError::Image(e.to_string())))?
            .to_rgba8();
        let tileset = Self::from_sheet(id, name, &sheet).map_err(malformed)?;
        tracing::info!("built tileset {} '{}' with {} tiles", id, name, tileset.len());
        Ok(tileset)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Preview bitmap, 64 pixels wide with one 8x8 cell per tile.
    pub fn atlas(&self) -> &RgbaImage {
        &self.atlas
    }
}

impl fmt::Debug for Tileset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tileset")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tiles", &self.tiles.len())
            .finish()
    }
}

/// Lay tiles out row-major over a checkerboard and mark trailing cells.
fn render_atlas(tiles: &[Tile]) -> RgbaImage {
    let rows = (tiles.len() as u32).div_ceil(ATLAS_TILES_X);
    let mut atlas = RgbaImage::new(ATLAS_TILES_X * TILE_SIZE, rows * TILE_SIZE);
    checkerboard(&mut atlas, ATLAS_CHECKER_SIZE, ATLAS_CHECKER_SIZE);

    for (i, tile) in tiles.iter().enumerate() {
        let x = (i as u32 % ATLAS_TILES_X) * TILE_SIZE;
        let y = (i as u32 / ATLAS_TILES_X) * TILE_SIZE;
        draw(&mut atlas, x as i32, y as i32, &tile.colors, false, false);
    }

    let used = tiles.len() as u32 % ATLAS_TILES_X;
    if used != 0 {
        let y = (rows - 1) * TILE_SIZE;
        for col in used..ATLAS_TILES_X {
            cross(&mut atlas, (col * TILE_SIZE) as i32, y as i32, TILE_SIZE, TILE_SIZE, UNUSED_CELL);
        }
    }

    atlas
}
