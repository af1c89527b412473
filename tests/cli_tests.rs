//! CLI integration tests
//!
//! These tests run the built binary against a temporary asset tree and check
//! exit codes, printed output and written images.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::{asset_tree, GREEN, RED};
use tilecomp::compositor::UNUSED_CELL;

fn run_tilecomp(assets: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tilecomp"))
        .arg("--assets")
        .arg(assets)
        .args(args)
        .current_dir(assets)
        .output()
        .expect("Failed to execute tilecomp")
}

fn get_image_dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).expect("Failed to open output image");
    (img.width(), img.height())
}

#[test]
fn test_atlas_by_name() {
    let dir = asset_tree();
    let out = dir.path().join("out").join("ground.png");
    let output = run_tilecomp(dir.path(), &["atlas", "Ground", "-o", out.to_str().unwrap()]);

    assert!(output.status.success(), "atlas failed: {}", String::from_utf8_lossy(&output.stderr));
    let atlas = image::open(&out).unwrap().to_rgba8();
    assert_eq!(atlas.dimensions(), (64, 8));
    assert_eq!(*atlas.get_pixel(0, 0), RED);
    assert_eq!(*atlas.get_pixel(16, 0), UNUSED_CELL);
}

#[test]
fn test_atlas_by_id_with_scale() {
    let dir = asset_tree();
    let out = dir.path().join("water.png");
    let output = run_tilecomp(dir.path(), &["atlas", "1", "--scale", "2", "-o", out.to_str().unwrap()]);

    assert!(output.status.success(), "atlas failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(get_image_dimensions(&out), (128, 16));
}

#[test]
fn test_block_single_elevation() {
    let dir = asset_tree();
    let out = dir.path().join("block.png");
    let output =
        run_tilecomp(dir.path(), &["block", "Town", "0", "--elevation", "1", "-o", out.to_str().unwrap()]);

    assert!(output.status.success(), "block failed: {}", String::from_utf8_lossy(&output.stderr));
    let image = image::open(&out).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (16, 16));
    assert_eq!(*image.get_pixel(12, 0), GREEN);
    assert_eq!(image.get_pixel(0, 0)[3], 0);
}

#[test]
fn test_block_index_out_of_range() {
    let dir = asset_tree();
    let out = dir.path().join("block.png");
    let output = run_tilecomp(dir.path(), &["block", "Town", "9", "-o", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no block 9"));
    assert!(!out.exists());
}

#[test]
fn test_blockset_preview() {
    let dir = asset_tree();
    let out = dir.path().join("town.png");
    let output = run_tilecomp(dir.path(), &["blockset", "Town", "-o", out.to_str().unwrap()]);

    assert!(output.status.success(), "blockset failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(get_image_dimensions(&out), (128, 16));
}

#[test]
fn test_malformed_blockset_exit_code() {
    let dir = asset_tree();
    let out = dir.path().join("empty.png");
    let output = run_tilecomp(dir.path(), &["blockset", "Empty", "-o", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed blockset 'Empty'"));
}

#[test]
fn test_ids_json() {
    let dir = asset_tree();
    let output = run_tilecomp(dir.path(), &["ids", "tilesets", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["name"], "Ground");
    assert_eq!(json[1]["id"], 1);
}

#[test]
fn test_info_text() {
    let dir = asset_tree();
    let output = run_tilecomp(dir.path(), &["info", "Town"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Blockset 0 'Town'"));
    assert!(stdout.contains("Blocks:    2"));
    assert!(stdout.contains("Water"));
}

#[test]
fn test_export_reports_failures() {
    let dir = asset_tree();
    let out = dir.path().join("export");
    let output = run_tilecomp(dir.path(), &["export", "-o", out.to_str().unwrap()]);

    // Empty, Broken, Short and Missing cannot be rendered
    assert_eq!(output.status.code(), Some(1));
    assert!(out.join("tilesets").join("Ground.png").exists());
    assert!(out.join("tilesets").join("Water.png").exists());
    assert!(out.join("blocksets").join("Town.png").exists());
    assert!(!out.join("blocksets").join("Empty.png").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Exported 3 of 7 images"));
}

#[test]
fn test_invalid_scale_exit_code() {
    let dir = asset_tree();
    let output = run_tilecomp(dir.path(), &["ids", "blocksets", "--scale", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_file_scale() {
    let dir = asset_tree();
    let config = dir.path().join("tilecomp.toml");
    std::fs::write(&config, "[render]\nscale = 3\n").unwrap();
    let out = dir.path().join("water.png");

    // --assets still wins for the root, the scale comes from the file
    let output = run_tilecomp(
        dir.path(),
        &["--config", config.to_str().unwrap(), "atlas", "Water", "-o", out.to_str().unwrap()],
    );
    assert!(output.status.success(), "atlas failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(get_image_dimensions(&out), (192, 24));
}
