//! Environment and filesystem lookups the dispatcher depends on.

use std::path::Path;

pub trait Host {
    /// Value of an environment variable, `None` when unset or not unicode.
    fn var(&self, key: &str) -> Option<String>;

    fn is_dir(&self, path: &Path) -> bool;
}

/// Process environment and local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
