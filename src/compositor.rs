//! Pixel blitting onto RGBA canvases.
//!
//! All routines clip against the canvas and never blend: a source pixel with
//! zero alpha leaves the destination alone, anything else overwrites it.

use image::{Rgba, RgbaImage};

use crate::blockset::{Block, BLOCK_NUM_TILES_X, BLOCK_NUM_TILES_Y};
use crate::tileset::TILE_SIZE;

/// Light tone of the transparency checkerboard
pub const CHECKER_LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Dark tone of the transparency checkerboard
pub const CHECKER_DARK: Rgba<u8> = Rgba([191, 191, 191, 255]);
/// Marker color for unused atlas cells
pub const UNUSED_CELL: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn put_clipped(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    canvas.put_pixel(x as u32, y as u32, color);
}

/// Copy `src` onto `canvas` with its top-left corner at `(x, y)`.
///
/// `x_flip` mirrors the source horizontally and `y_flip` vertically.
/// Destination pixels outside the canvas are dropped.
pub fn draw(canvas: &mut RgbaImage, x: i32, y: i32, src: &RgbaImage, x_flip: bool, y_flip: bool) {
    let (src_w, src_h) = src.dimensions();

    for sy in 0..src_h {
        let dest_y = y as i64 + sy as i64;
        if dest_y < 0 {
            continue;
        }
        if dest_y >= canvas.height() as i64 {
            break;
        }
        let py = if y_flip { src_h - 1 - sy } else { sy };

        for sx in 0..src_w {
            let dest_x = x as i64 + sx as i64;
            if dest_x < 0 {
                continue;
            }
            if dest_x >= canvas.width() as i64 {
                break;
            }
            let px = if x_flip { src_w - 1 - sx } else { sx };

            let pixel = *src.get_pixel(px, py);
            if pixel[3] == 0 {
                continue;
            }
            canvas.put_pixel(dest_x as u32, dest_y as u32, pixel);
        }
    }
}

/// Fill the whole canvas with a two-tone checkerboard of `cell_w`x`cell_h` cells.
pub fn checkerboard(canvas: &mut RgbaImage, cell_w: u32, cell_h: u32) {
    if cell_w == 0 || cell_h == 0 {
        return;
    }
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        *pixel = if ((x / cell_w) + (y / cell_h)) % 2 == 0 { CHECKER_LIGHT } else { CHECKER_DARK };
    }
}

/// Draw both diagonals of the `w`x`h` rectangle at `(x, y)`.
pub fn cross(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) {
    let steps = w.max(h) as i64;
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);

    for i in 0..steps {
        let cx = i * w / steps;
        let cy = i * h / steps;
        put_clipped(canvas, x + cx, y + cy, color);
        put_clipped(canvas, x + w - 1 - cx, y + cy, color);
    }
}

/// Draw the tiles a block holds at one elevation.
///
/// Cells are visited row-major and each cell's stack is painted bottom to top.
pub fn draw_block(canvas: &mut RgbaImage, x: i32, y: i32, block: &Block, elevation: u8) {
    for by in 0..BLOCK_NUM_TILES_Y {
        for bx in 0..BLOCK_NUM_TILES_X {
            let tx = x + (bx as u32 * TILE_SIZE) as i32;
            let ty = y + (by as u32 * TILE_SIZE) as i32;
            for tile_ref in block.tiles().get(bx, by).layer(elevation) {
                draw(canvas, tx, ty, tile_ref.tile().colors(), tile_ref.x_flip, tile_ref.y_flip);
            }
        }
    }
}

/// Draw every elevation of a block, lowest first.
pub fn draw_block_all(canvas: &mut RgbaImage, x: i32, y: i32, block: &Block) {
    for elevation in 0..=u8::MAX {
        draw_block(canvas, x, y, block, elevation);
    }
}
