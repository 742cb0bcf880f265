use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;

// ============================================================================
// JSON Parsing Utilities
// ============================================================================

/// Parse JSON string into typed value.
pub(crate) fn from_str<T: DeserializeOwned>(s: &str, context: &str) -> Result<T> {
    serde_json::from_str(s)
        .map_err(|e| Error::validation_invalid_json(e, Some(context.to_string())))
}

/// Read JSON spec from string, file (@path), or stdin (-).
pub fn read_json_spec_to_string(spec: &str) -> Result<String> {
    use std::io::IsTerminal;

    if spec.trim() == "-" {
        let mut buf = String::new();
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(Error::validation_invalid_argument(
                "json",
                "Cannot read JSON from stdin when stdin is a TTY",
                None,
                None,
            ));
        }
        stdin
            .read_to_string(&mut buf)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read stdin".to_string())))?;
        return Ok(buf);
    }

    if let Some(path) = spec.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "json",
                "Invalid JSON spec '@' (missing file path)",
                None,
                None,
            ));
        }

        return read_file(Path::new(path));
    }

    Ok(spec.to_string())
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::internal_io(
                format!("File not found: {}", path.display()),
                Some("read file".to_string()),
            )
        } else {
            Error::internal_io(e.to_string(), Some("read file".to_string()))
        }
    })
}

/// Load a JSON file from the config dir, treating a missing file as `T::default()`.
pub(crate) fn load_optional<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        log::debug!("{} not found, using empty default", path.display());
        return Ok(T::default());
    }

    let content = read_file(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}
