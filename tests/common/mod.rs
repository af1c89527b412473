//! Shared asset fixtures for integration tests
//!
//! Builds a small asset tree in a temporary directory:
//!
//! Tilesets
//! - 0 `Ground`: tile 0 solid red, tile 1 green left half, clear right half
//! - 1 `Water`: one solid blue tile
//!
//! Blocksets
//! - 0 `Town`: two blocks using both tilesets
//! - 1 `Empty`: declares zero blocks
//! - 2 `Broken`: references tileset id 9
//! - 3 `Short`: `Town` cut off mid-record
//! - 4 `Missing`: listed but no file on disk

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use tilecomp::blockset::{write_blockset, BlockData, TileRefData};

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

pub fn png(image: RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

pub fn ground_sheet() -> RgbaImage {
    RgbaImage::from_fn(16, 8, |x, _| match x {
        0..=7 => RED,
        8..=11 => GREEN,
        _ => CLEAR,
    })
}

pub fn water_sheet() -> RgbaImage {
    RgbaImage::from_pixel(8, 8, BLUE)
}

pub fn tile(tileset: i32, tile: i32) -> TileRefData {
    TileRefData { x_flip: false, y_flip: false, tileset, tile }
}

/// Block 0: red under green at (0,0) elevation 0, flipped green at (1,0)
/// elevation 1, water at (0,1). Block 1: water everywhere at elevation 3.
pub fn town_blocks() -> Vec<BlockData> {
    let mut first = BlockData { behavior: 1, ..Default::default() };
    first.tiles.get_mut(0, 0).set_layer(0, vec![tile(0, 0), tile(0, 1)]);
    first.tiles.get_mut(1, 0).set_layer(1, vec![TileRefData { x_flip: true, ..tile(0, 1) }]);
    first.tiles.get_mut(0, 1).set_layer(0, vec![tile(1, 0)]);

    let mut second = BlockData { behavior: 7, ..Default::default() };
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        second.tiles.get_mut(x, y).set_layer(3, vec![tile(1, 0)]);
    }
    vec![first, second]
}

pub fn encode(blocks: &[BlockData]) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_blockset(&mut bytes, blocks).unwrap();
    bytes
}

fn write(root: &Path, path: &str, bytes: &[u8]) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, bytes).unwrap();
}

/// Write the fixture asset tree into a new temporary directory.
pub fn asset_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "Tileset/TilesetIds.txt", b"Ground\nWater\n");
    write(root, "Tileset/Ground.png", &png(ground_sheet()));
    write(root, "Tileset/Water.png", &png(water_sheet()));

    let town = encode(&town_blocks());
    let mut broken_block = BlockData::default();
    broken_block.tiles.get_mut(0, 0).set_layer(0, vec![tile(9, 0)]);

    write(root, "Blockset/BlocksetIds.txt", b"Town\nEmpty\nBroken\nShort\nMissing\n");
    write(root, "Blockset/Town.pgeblockset", &town);
    write(root, "Blockset/Empty.pgeblockset", &[0, 0]);
    write(root, "Blockset/Broken.pgeblockset", &encode(&[broken_block]));
    write(root, "Blockset/Short.pgeblockset", &town[..town.len() / 2]);

    dir
}
