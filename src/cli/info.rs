//! Info command implementations (ids, info)

use serde::Serialize;
use std::collections::BTreeMap;
use std::process::ExitCode;

use crate::assets::Assets;
use crate::blockset::Blockset;

use super::{load_blockset, IdKind, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Debug, Serialize)]
struct IdEntry<'a> {
    id: u32,
    name: &'a str,
}

/// Summary of a blockset as printed by `info`
#[derive(Debug, Serialize)]
struct BlocksetInfo<'a> {
    id: u32,
    name: &'a str,
    blocks: usize,
    /// Referenced tilesets as (id, name)
    tilesets: Vec<IdEntry<'a>>,
    /// Number of blocks per behavior value
    behaviors: BTreeMap<u8, usize>,
    /// Total tile references over every cell and elevation
    tile_refs: usize,
}

impl<'a> BlocksetInfo<'a> {
    fn new(assets: &'a Assets, blockset: &'a Blockset) -> Self {
        let tilesets = blockset
            .tileset_ids()
            .into_iter()
            .map(|id| IdEntry { id, name: assets.tileset_ids().name(id).unwrap_or("?") })
            .collect();

        let mut behaviors = BTreeMap::new();
        let mut tile_refs = 0;
        for block in blockset.blocks() {
            *behaviors.entry(block.behavior()).or_insert(0) += 1;
            tile_refs += block.tiles().iter().map(|(_, _, table)| table.ref_count()).sum::<usize>();
        }

        Self { id: blockset.id(), name: blockset.name(), blocks: blockset.len(), tilesets, behaviors, tile_refs }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to serialize output: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the ids command
pub fn run_ids(assets: &Assets, kind: IdKind, json: bool) -> ExitCode {
    let ids = match kind {
        IdKind::Tilesets => assets.tileset_ids(),
        IdKind::Blocksets => assets.blockset_ids(),
    };

    if json {
        let entries: Vec<IdEntry> = ids.iter().map(|(id, name)| IdEntry { id, name }).collect();
        return print_json(&entries);
    }

    for (id, name) in ids.iter() {
        println!("{:>4}  {}", id, name);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the info command
pub fn run_info(assets: &Assets, key: &str, json: bool) -> ExitCode {
    let blockset = match load_blockset(assets, key) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let info = BlocksetInfo::new(assets, &blockset);

    if json {
        return print_json(&info);
    }

    println!("Blockset {} '{}'", info.id, info.name);
    println!("  Blocks:    {}", info.blocks);
    println!("  Tile refs: {}", info.tile_refs);
    println!("  Tilesets:");
    for ts in &info.tilesets {
        println!("    {:>4}  {}", ts.id, ts.name);
    }
    println!("  Behaviors:");
    for (behavior, count) in &info.behaviors {
        println!("    {:>4}  {} blocks", behavior, count);
    }
    ExitCode::from(EXIT_SUCCESS)
}
