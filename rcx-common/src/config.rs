//! Configuration file resolution and loading
//!
//! Services resolve their TOML configuration in priority order:
//! 1. Explicit path (command-line argument, highest priority)
//! 2. Environment variable (`RCX_<SERVICE>_CONFIG`)
//! 3. Platform config directory (`~/.config/rcx/<service>.toml`,
//!    `/etc/rcx/<service>.toml` on Linux)
//! 4. Compiled defaults (no file at all)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::warn;

/// Resolve the configuration file path for a service.
///
/// Returns `None` when no file is configured anywhere in the chain, in
/// which case the caller falls back to compiled defaults.
pub fn resolve_config_path(service: &str, cli_arg: Option<&str>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    let env_var = format!("RCX_{}_CONFIG", service.replace('-', "_").to_uppercase());
    if let Ok(path) = std::env::var(&env_var) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    let file_name = format!("{}.toml", service);
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("rcx").join(&file_name)) {
        if user_config.exists() {
            return Some(user_config);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/rcx").join(&file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    // Priority 4: compiled defaults
    None
}

/// Load and parse a TOML configuration file.
pub fn load_toml_file<T: DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load a service configuration, falling back to defaults when no file
/// is configured.
///
/// A file named by priority 1 or 2 that does not exist is an error (the
/// operator asked for it explicitly); a missing platform-default file is
/// not.
pub fn load_service_config<T: DeserializeOwned + Default>(
    service: &str,
    cli_arg: Option<&str>,
) -> Result<T> {
    match resolve_config_path(service, cli_arg) {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            load_toml_file(&path)
        }
        None => {
            warn!(service = service, "No config file found, using compiled defaults");
            Ok(T::default())
        }
    }
}
