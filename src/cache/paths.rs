// Cache path utilities.
// Resolves where the persistent offline store lives on disk.

use std::path::PathBuf;

use directories::ProjectDirs;

/// File name of the persistent offline store.
pub const STORE_FILE: &str = "offline.json";

/// Get the base cache directory (~/.cache/webber on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "webber").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the default persistent offline store.
pub fn default_store_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(STORE_FILE))
}
