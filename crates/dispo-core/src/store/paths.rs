//! Store directory names and discovery

use std::path::{Path, PathBuf};

use crate::error::{DispoError, Result};

/// Default store directory name (hidden)
pub const DEFAULT_STORE_DIR: &str = ".dispo";

/// Visible store directory name
pub const VISIBLE_STORE_DIR: &str = "dispo";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// Gitignore filename
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Walk up from `root` looking for a store directory
pub fn discover_store(root: &Path) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    loop {
        let store_path = current.join(DEFAULT_STORE_DIR);
        if store_path.is_dir() {
            return Ok(store_path);
        }

        let visible_path = current.join(VISIBLE_STORE_DIR);
        if visible_path.is_dir() {
            return Ok(visible_path);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(DispoError::StoreNotFound {
                    search_root: root.to_path_buf(),
                });
            }
        }
    }
}
