//! Render command implementations (atlas, block, blockset)

use image::RgbaImage;
use std::path::Path;
use std::process::ExitCode;

use crate::assets::Assets;
use crate::output::{save_png, scale_image};

use super::{load_blockset, load_tileset, EXIT_ERROR, EXIT_SUCCESS};

fn write_image(image: RgbaImage, output: &Path, scale: u32) -> ExitCode {
    let image = scale_image(image, scale);
    match save_png(&image, output) {
        Ok(()) => {
            println!("Saved: {} ({}x{})", output.display(), image.width(), image.height());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to save '{}': {}", output.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the atlas command
pub fn run_atlas(assets: &Assets, key: &str, output: &Path, scale: u32) -> ExitCode {
    let tileset = match load_tileset(assets, key) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    write_image(tileset.atlas().clone(), output, scale)
}

/// Execute the block command
pub fn run_block(
    assets: &Assets,
    key: &str,
    index: usize,
    elevation: Option<u8>,
    output: &Path,
    scale: u32,
) -> ExitCode {
    let blockset = match load_blockset(assets, key) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let Some(block) = blockset.block(index) else {
        eprintln!(
            "Error: blockset '{}' has {} blocks, no block {}",
            blockset.name(),
            blockset.len(),
            index
        );
        return ExitCode::from(EXIT_ERROR);
    };
    write_image(block.render(elevation), output, scale)
}

/// Execute the blockset command
pub fn run_blockset(assets: &Assets, key: &str, output: &Path, scale: u32) -> ExitCode {
    let blockset = match load_blockset(assets, key) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    write_image(blockset.render_atlas(), output, scale)
}
