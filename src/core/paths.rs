use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "BLOOM_CONFIG_DIR";

/// Base bloom config directory (~/.config/bloom/ on Unix-like systems)
pub fn bloom() -> Result<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(shellexpand::tilde(&dir).as_ref()));
        }
    }

    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("bloom"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("bloom"))
    }
}

/// Global bloom.json config file path
pub fn bloom_json() -> Result<PathBuf> {
    Ok(bloom()?.join("bloom.json"))
}

/// Node registry file path
pub fn nodes_json() -> Result<PathBuf> {
    Ok(bloom()?.join("nodes.json"))
}

/// Filter agent collection file path
pub fn agents_json() -> Result<PathBuf> {
    Ok(bloom()?.join("agents.json"))
}
