//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up farmlink defaults.

use crate::config::{default_save_root, Config};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Handle the configure command
///
/// # Arguments
/// * `server` - Optional resource server URL to set as default
/// * `root` - Optional save root folder to set as default
/// * `show` - If true, show current configuration
pub fn handle(server: Option<String>, root: Option<PathBuf>, show: bool) -> Result<()> {
    handle_at(&Config::config_path()?, server, root, show)
}

/// Handle the configure command against the config file at `config_path`
pub fn handle_at(
    config_path: &Path,
    server: Option<String>,
    root: Option<PathBuf>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load_from(config_path)?;

    if show {
        show_config(&config, config_path);
        return Ok(());
    }

    if server.is_none() && root.is_none() {
        show_usage();
        return Ok(());
    }

    if let Some(server) = server {
        println!("Server configured: {}", server);
        config.set_server(server);
    }
    if let Some(root) = root {
        println!("Save root configured: {}", root.display());
        config.set_save_root(root);
    }

    config.save_to(config_path)?;
    println!("Config saved to: {}", config_path.display());

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config, config_path: &Path) {
    match &config.server {
        Some(server) => println!("Server: {}", server),
        None => println!("No server configured"),
    }

    match (&config.save_root, default_save_root()) {
        (Some(root), _) => println!("Save root: {}", root.display()),
        (None, Some(default)) => println!("Save root: {} (default)", default.display()),
        (None, None) => println!("No save root configured"),
    }

    println!("Config file: {}", config_path.display());
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: farmlink configure --server http://HOST:PORT");
    println!("   or: farmlink configure --root PATH");
    println!("   or: farmlink configure --show");
    println!();
    println!("Note: the save root is the folder containing savegame1, savegame2, ...");
    println!("      It defaults to Documents/My Games/FarmingSimulator2019.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_server_and_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farmlink").join("config.toml");

        handle_at(&path, Some("http://farm:8080".to_string()), None, false).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.as_deref(), Some("http://farm:8080"));
        assert_eq!(config.save_root, None);

        handle_at(&path, None, Some(PathBuf::from("/saves")), false).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.as_deref(), Some("http://farm:8080"));
        assert_eq!(config.save_root, Some(PathBuf::from("/saves")));
    }

    #[test]
    fn test_no_arguments_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        handle_at(&path, None, None, false).unwrap();
        assert!(!path.exists());

        handle_at(&path, None, None, true).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_show_leaves_config_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        handle_at(&path, Some("http://farm:8080".to_string()), None, false).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        handle_at(&path, Some("http://other:9000".to_string()), None, true).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = [").unwrap();

        assert!(handle_at(&path, Some("http://farm:8080".to_string()), None, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "server = [");
    }
}
