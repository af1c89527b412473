//! Export command: render every tileset atlas and blockset preview

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::assets::Assets;
use crate::output::{save_png, scale_image};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Output of a single export job
struct Exported {
    path: PathBuf,
    result: Result<(), String>,
}

fn export_tileset(assets: &Assets, id: u32, name: &str, dir: &Path, scale: u32) -> Exported {
    let path = dir.join("tilesets").join(format!("{}.png", name));
    let result = assets
        .tileset(id)
        .map_err(|e| e.to_string())
        .and_then(|t| save_png(&scale_image(t.atlas().clone(), scale), &path).map_err(|e| e.to_string()));
    Exported { path, result }
}

fn export_blockset(assets: &Assets, id: u32, name: &str, dir: &Path, scale: u32) -> Exported {
    let path = dir.join("blocksets").join(format!("{}.png", name));
    let result = assets
        .blockset(id)
        .map_err(|e| e.to_string())
        .and_then(|b| save_png(&scale_image(b.render_atlas(), scale), &path).map_err(|e| e.to_string()));
    Exported { path, result }
}

/// Execute the export command
///
/// Failures are reported per image; the remaining images are still written.
pub fn run_export(assets: &Assets, output: &Path, scale: u32) -> ExitCode {
    let blocksets: Vec<(u32, &str)> = assets.blockset_ids().iter().collect();
    let tilesets: Vec<(u32, &str)> = assets.tileset_ids().iter().collect();

    let mut results: Vec<Exported> = blocksets
        .par_iter()
        .map(|&(id, name)| export_blockset(assets, id, name, output, scale))
        .collect();
    results.extend(
        tilesets.par_iter().map(|&(id, name)| export_tileset(assets, id, name, output, scale)).collect::<Vec<_>>(),
    );

    let mut failed = 0;
    for item in &results {
        match &item.result {
            Ok(()) => println!("Saved: {}", item.path.display()),
            Err(e) => {
                eprintln!("Error: {}: {}", item.path.display(), e);
                failed += 1;
            }
        }
    }

    let ts = assets.tileset_cache().stats();
    let bs = assets.blockset_cache().stats();
    tracing::info!(
        "tileset cache: {} hits, {} misses; blockset cache: {} hits, {} misses",
        ts.hits,
        ts.misses,
        bs.hits,
        bs.misses
    );

    println!("Exported {} of {} images to {}", results.len() - failed, results.len(), output.display());
    if failed > 0 {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
