//! Configuration loading and discovery for `tilecomp.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::TilecompConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE: &str = "tilecomp.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tilecomp.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override asset root directory
    pub assets: Option<PathBuf>,
    /// Override output scale factor
    pub scale: Option<u32>,
}

/// Find tilecomp.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find tilecomp.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tilecomp.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// A relative `assets.root` is resolved against the directory holding the
/// config file.
pub fn load_config(path: Option<&Path>) -> Result<TilecompConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(TilecompConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<TilecompConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: TilecompConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = path.parent() {
        config.assets.root = resolve_path(root, &config.assets.root);
    }
    tracing::debug!("loaded config from '{}'", path.display());

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged result
/// is validated again.
pub fn merge_cli_overrides(
    config: &mut TilecompConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(ref assets) = overrides.assets {
        config.assets.root = assets.clone();
    }

    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }

    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[render]\nscale = 2")
            .expect("should write config content");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "").expect("should write config");

        let subdir = temp.path().join("maps").join("town");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        assert_eq!(find_config_from(subdir), Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        // A tilecomp.toml above the temp dir would be found instead
        if let Some(path) = found {
            assert!(!path.starts_with(temp.path()));
        }
    }

    #[test]
    fn test_load_config_resolves_root() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[assets]\nroot = \"game/assets\"\n[render]\nscale = 3\n")
            .expect("should write config");

        let config = load_config(Some(&config_path)).expect("should load config");
        assert_eq!(config.assets.root, temp.path().join("game/assets"));
        assert_eq!(config.render.scale, 3);
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[render\nscale = 2").expect("should write config");

        assert!(matches!(load_config(Some(&config_path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[render]\nscale = 99").expect("should write config");

        let err = load_config(Some(&config_path)).unwrap_err();
        assert!(err.to_string().contains("render.scale"));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = TilecompConfig::default();
        let overrides = CliOverrides { assets: Some(PathBuf::from("/data")), scale: Some(4) };
        merge_cli_overrides(&mut config, &overrides).expect("overrides are valid");
        assert_eq!(config.assets.root, PathBuf::from("/data"));
        assert_eq!(config.render.scale, 4);

        let bad = CliOverrides { scale: Some(0), ..Default::default() };
        assert!(merge_cli_overrides(&mut config, &bad).is_err());
    }
}
