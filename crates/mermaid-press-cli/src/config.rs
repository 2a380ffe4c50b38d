//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use mermaid_press::{PressError, config::AppConfig};

/// Local configuration path, relative to the working directory.
const LOCAL_CONFIG: &str = "mermaid-press/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for PressError {
    fn from(err: ConfigError) -> Self {
        PressError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (mermaid-press/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, PressError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "mermaid-press", "mermaid-press") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, PressError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content).map_err(|message| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        }
        .into()
    })
}

fn parse_config(content: &str) -> Result<AppConfig, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").expect("empty config parses");
        assert_eq!(config.renderer().command(), "mmdc");
        assert_eq!(config.renderer().width(), 800);
        assert_eq!(config.output().images_dir(), Path::new("images"));
        assert_eq!(config.extract().language(), "mermaid");
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(
            r#"
            [renderer]
            command = "npx"
            args = ["-p", "@mermaid-js/mermaid-cli", "mmdc"]
            timeout_secs = 60

            [output]
            images_dir = "build/diagrams"
            display_width = "100%"
            "#,
        )
        .expect("config parses");

        assert_eq!(config.renderer().command(), "npx");
        assert_eq!(config.renderer().args().len(), 3);
        assert_eq!(config.renderer().timeout_secs(), Some(60));
        assert_eq!(config.renderer().background(), "transparent");
        assert_eq!(config.output().images_dir(), Path::new("build/diagrams"));
        assert_eq!(config.output().display_width(), "100%");
        assert_eq!(config.output().alt_text(), "Diagram");
        assert!(!config.output().reuse_existing());
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[renderer]\nwidth = \"wide\"\n").expect("write config");

        let err = load_config(Some(&path)).expect_err("invalid config fails");

        assert!(matches!(err, PressError::Config(ref msg) if msg.contains("Failed to parse")));
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().expect("Failed to create temp directory");
        let err =
            load_config(Some(dir.path().join("nope.toml"))).expect_err("missing config fails");

        assert!(matches!(
            err,
            PressError::Config(ref msg) if msg.contains("Missing configuration file")
        ));
    }
}
