//! Store management for dispo
//!
//! The store is the root directory containing all dispo data: the
//! SQLite database plus `config.toml`. Default location: `.dispo/`.

pub mod paths;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::buyer::Buyer;
use crate::config::StoreConfig;
use crate::db::{Database, DB_FILE};
use crate::error::{DispoError, Result};
use crate::group::Group;
use crate::id;
use crate::tag::Tag;
use paths::{CONFIG_FILE, DEFAULT_STORE_DIR, GITIGNORE_FILE, VISIBLE_STORE_DIR};

/// Options for store initialization
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Use visible store directory (`dispo/` instead of `.dispo/`)
    pub visible: bool,
}

/// The dispo store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Store configuration
    config: StoreConfig,
    /// SQLite database
    db: Database,
}

impl Store {
    /// Discover a store by walking up from the given root directory
    pub fn discover(root: &Path) -> Result<Self> {
        let store_path = paths::discover_store(root)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(DispoError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        let db_path = path.join(DB_FILE);
        if !config_path.exists() && !db_path.exists() {
            return Err(DispoError::InvalidStore {
                reason: format!(
                    "{} has neither {} nor {}",
                    path.display(),
                    CONFIG_FILE,
                    DB_FILE
                ),
            });
        }

        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            // Missing config is fine; every field has a default
            StoreConfig::default()
        };

        let db = Database::open(path)?;

        Ok(Store {
            root: path.to_path_buf(),
            config,
            db,
        })
    }

    /// Initialize a new store under the given project root
    pub fn init(project_root: &Path, options: InitOptions) -> Result<Self> {
        let store_name = if options.visible {
            VISIBLE_STORE_DIR
        } else {
            DEFAULT_STORE_DIR
        };

        let store_path = project_root.join(store_name);
        Self::init_at(&store_path)
    }

    /// Initialize a store at an explicit store root path
    #[tracing::instrument(skip(store_root), fields(path = %store_root.display()))]
    pub fn init_at(store_root: &Path) -> Result<Self> {
        fs::create_dir_all(store_root)?;

        // Avoid rewriting an existing config on repeated init
        let config_path = store_root.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            let config = StoreConfig::default();
            config.save(&config_path)?;
            config
        };

        ensure_store_gitignore(store_root)?;

        let db = Database::open(store_root)?;

        Ok(Store {
            root: store_root.to_path_buf(),
            config,
            db,
        })
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Get the database file path
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }

    /// Get the config
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the database
    pub fn db(&self) -> &Database {
        &self.db
    }

    // Buyers

    /// Generate an id for a new buyer
    pub fn new_buyer_id(&self, seed: &str) -> Result<String> {
        let existing: HashSet<String> = self.db.buyer_ids()?.into_iter().collect();
        Ok(id::generate(
            self.config.id_scheme,
            id::BUYER_PREFIX,
            seed,
            &existing,
        ))
    }

    /// Validate and persist a buyer (insert or full replace)
    pub fn put_buyer(&self, buyer: &Buyer) -> Result<()> {
        buyer.validate()?;
        self.db.insert_buyer(buyer)
    }

    /// Load one buyer, erroring when absent
    pub fn get_buyer(&self, id: &str) -> Result<Buyer> {
        self.db.get_buyer(id)?.ok_or_else(|| DispoError::BuyerNotFound {
            id: id.to_string(),
        })
    }

    /// All buyers, newest first
    pub fn buyers(&self) -> Result<Vec<Buyer>> {
        self.db.list_buyers()
    }

    // Tags

    /// Register a tag, refusing duplicates by name
    pub fn create_tag(&self, name: &str, color: Option<&str>, protected: bool) -> Result<Tag> {
        if self.db.get_tag_by_name(name)?.is_some() {
            return Err(DispoError::already_exists("tag", name));
        }

        let existing: HashSet<String> = self.db.tag_ids()?.into_iter().collect();
        let id = id::generate(self.config.id_scheme, id::TAG_PREFIX, name, &existing);

        let mut tag = Tag::new(id, name, Utc::now());
        if let Some(color) = color {
            tag.color = color.to_string();
        }
        tag.is_protected = protected;
        self.db.insert_tag(&tag)?;
        Ok(tag)
    }

    /// All tags with usage counts freshly recomputed
    pub fn tags(&self) -> Result<Vec<Tag>> {
        self.db.recount_tag_usage()?;
        self.db.list_tags()
    }

    // Groups

    /// Create a group filed under a folder
    pub fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        folder: Option<&str>,
        color: Option<&str>,
    ) -> Result<Group> {
        let existing: HashSet<String> = self.db.group_ids()?.into_iter().collect();
        let id = id::generate(self.config.id_scheme, id::GROUP_PREFIX, name, &existing);

        let mut group = Group::new(id, name, Utc::now());
        group.description = description.map(|s| s.to_string());
        if let Some(folder) = folder {
            group.set_folder(folder);
        }
        if let Some(color) = color {
            group.color = Some(color.to_string());
        }
        self.db.insert_group(&group)?;
        Ok(group)
    }

    /// Load one group, erroring when absent
    pub fn get_group(&self, id: &str) -> Result<Group> {
        self.db
            .get_group(id)?
            .ok_or_else(|| DispoError::not_found("group", id))
    }

    /// All groups, alphabetical
    pub fn groups(&self) -> Result<Vec<Group>> {
        self.db.list_groups()
    }
}

fn ensure_store_gitignore(store_root: &Path) -> Result<()> {
    let path = store_root.join(GITIGNORE_FILE);
    let required = [DB_FILE, "dispo.db-wal", "dispo.db-shm"];

    if !path.exists() {
        fs::write(&path, format!("{}\n", required.join("\n")))?;
        return Ok(());
    }

    let mut content = fs::read_to_string(&path)?;
    let mut changed = false;

    for entry in required {
        if !content.lines().any(|l| l.trim() == entry) {
            if !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(entry);
            content.push('\n');
            changed = true;
        }
    }

    if changed {
        fs::write(&path, content)?;
    }

    Ok(())
}
