//! User-level configuration (~/.config/pkgwire/config.toml)
//!
//! Machine-specific settings that should NOT be committed to version control,
//! like where the local package store lives.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the package store location.
pub const STORE_ENV: &str = "PKGWIRE_STORE";

/// User configuration loaded from ~/.config/pkgwire/config.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserConfig {
    /// Package store directory
    pub store_dir: Option<PathBuf>,
    /// Message language (e.g. "en", "zh", "zh_tw")
    pub language: Option<String>,
}

/// Get the user config directory path.
///
/// Returns `~/.config/pkgwire/` on Unix and `%APPDATA%\pkgwire\` on Windows.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pkgwire"))
}

/// Get the user config file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|p| p.join("config.toml"))
}

/// Load user configuration.
///
/// Returns defaults if the config file doesn't exist.
/// Returns an error if the file exists but is invalid TOML.
pub fn load_user_config() -> Result<UserConfig> {
    match get_config_path() {
        Some(path) if path.exists() => load_user_config_from(&path),
        _ => Ok(UserConfig::default()),
    }
}

pub fn load_user_config_from(path: &std::path::Path) -> Result<UserConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read user config at {}: {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse user config at {}: {}",
            path.display(),
            e
        ))
    })
}

/// Resolve the package store directory.
///
/// Precedence: explicit flag, then `PKGWIRE_STORE`, then `store_dir` from
/// the user config, then the platform data directory.
pub fn resolve_store_dir(flag: Option<PathBuf>, config: &UserConfig) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(STORE_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = &config.store_dir {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|d| d.join("pkgwire").join("packages"))
        .ok_or_else(|| Error::Config("Unable to determine a package store directory".to_string()))
}

/// Generate a template for the user config file
pub fn generate_user_config_template() -> &'static str {
    r#"# pkgwire user configuration (machine-specific, not committed to version control)

# Where installed packages are catalogued (defaults to the platform data dir)
# store_dir = "/home/me/.local/share/pkgwire/packages"

# Message language: en, zh, zh_tw (defaults to the system locale)
# language = "en"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_user_config() {
        let config = UserConfig::default();
        assert!(config.store_dir.is_none());
        assert!(config.language.is_none());
    }

    #[test]
    fn test_get_config_dir() {
        // May be None in some test environments
        if let Some(d) = get_config_dir() {
            assert!(d.ends_with("pkgwire"));
        }
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "store_dir = \"/opt/pkgs\"\nlanguage = \"zh\"\n").unwrap();

        let config = load_user_config_from(&path).unwrap();
        assert_eq!(config.store_dir, Some(PathBuf::from("/opt/pkgs")));
        assert_eq!(config.language.as_deref(), Some("zh"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "store_dir = [").unwrap();

        let err = load_user_config_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_template_is_valid_toml() {
        let config: UserConfig = toml::from_str(generate_user_config_template()).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    #[serial]
    fn test_store_dir_precedence() {
        let prev = std::env::var_os(STORE_ENV);
        let config = UserConfig {
            store_dir: Some(PathBuf::from("/from/config")),
            language: None,
        };

        std::env::set_var(STORE_ENV, "/from/env");
        assert_eq!(
            resolve_store_dir(Some(PathBuf::from("/from/flag")), &config).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_store_dir(None, &config).unwrap(),
            PathBuf::from("/from/env")
        );

        std::env::remove_var(STORE_ENV);
        assert_eq!(
            resolve_store_dir(None, &config).unwrap(),
            PathBuf::from("/from/config")
        );

        match prev {
            Some(v) => std::env::set_var(STORE_ENV, v),
            None => std::env::remove_var(STORE_ENV),
        }
    }
}
